//! Argument parsing shared by the command handlers.

use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use leave_domain::calendar;

use crate::cli::core::CommandError;

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

/// The positional argument at `index`, or a usage error.
pub(crate) fn required<'a>(
    args: &[&'a str],
    index: usize,
    usage: &str,
) -> Result<&'a str, CommandError> {
    args.get(index).copied().ok_or_else(|| usage_error(usage))
}

pub(crate) fn date(value: &str) -> Result<NaiveDate, CommandError> {
    calendar::parse_iso(value).map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub(crate) fn number<T>(value: &str, field: &str) -> Result<T, CommandError>
where
    T: FromStr,
{
    value.trim().parse().map_err(|_| {
        CommandError::InvalidArguments(format!("{field} must be a whole number, got `{value}`"))
    })
}

/// Parses any value whose `FromStr` error is a displayable message.
pub(crate) fn parsed<T>(value: &str) -> Result<T, CommandError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|err: T::Err| CommandError::InvalidArguments(err.to_string()))
}

/// Remaining words joined into free text, `None` when empty.
pub(crate) fn text_from(args: &[&str], index: usize) -> Option<String> {
    let text = args.get(index..).unwrap_or_default().join(" ");
    (!text.trim().is_empty()).then_some(text)
}

/// Splits `--flag` switches from positional arguments.
pub(crate) fn split_flags<'a>(args: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    args.iter().copied().partition(|arg| !arg.starts_with("--"))
}
