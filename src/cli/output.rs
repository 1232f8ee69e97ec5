use std::fmt;

use colored::Colorize;
use leave_core::{NotificationSink, Outcome};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
    Detail,
}

/// Turns ANSI colouring on or off for every helper below.
pub fn set_color_enabled(enabled: bool) {
    colored::control::set_override(enabled);
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[+]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Hint => ("HINT", ">"),
        MessageKind::Section | MessageKind::Detail => ("", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Detail => text,
        _ => {
            let (label, icon) = build_label(kind);
            format!("{label}: {icon} {text}")
        }
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.bright_cyan().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info | MessageKind::Detail => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Indented plain line used inside a section.
pub fn detail(message: impl fmt::Display) {
    print(MessageKind::Detail, format!("  {message}"));
}

/// Prints each manager outcome as a success or error line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, outcome: &Outcome) {
        let line = format!("{}: {}", outcome.title, outcome.message);
        if outcome.success {
            success(line);
        } else {
            error(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_styles_carry_labels() {
        set_color_enabled(false);
        assert_eq!(apply_style(MessageKind::Warning, "careful"), "WARNING: [!] careful");
        assert_eq!(apply_style(MessageKind::Section, " Balance "), "=== Balance ===");
        assert_eq!(apply_style(MessageKind::Detail, "PL 24"), "PL 24");
    }
}
