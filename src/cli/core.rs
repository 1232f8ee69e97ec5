//! Shell context, dispatch, and error reporting for the leave planner CLI.

use std::{io, sync::Arc};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{info, warn};

use leave_config::{default_base_dir, Config, ConfigError, ConfigManager};
use leave_core::{
    Clock, CoreError, IdScheme, LeaveManager, LeavePriority, LeaveSuggestion,
};
use leave_domain::HolidayCalendar;
use leave_storage_json::JsonKeyValueStore;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;
use super::system_clock::SystemClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Fatal errors that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Errors from a single command; reported and the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: LeaveManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Suggestions from the last `plan` command, addressed by `use-plan <n>`.
    pub last_suggestions: Vec<LeaveSuggestion>,
    pub last_command: Option<String>,
    pub running: bool,
    theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(default_base_dir())?;
        let (config, config_warning) = match config_manager.load() {
            Ok(config) => (config, None),
            Err(err) => (Config::default(), Some(err)),
        };
        crate::init_with_filter(config.log_filter.as_deref());
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);
        if let Some(err) = config_warning {
            warn!(error = %err, "config unreadable, using defaults");
            output::warning(format!("Configuration could not be read ({err}); using defaults."));
        }

        let data_dir = config_manager.data_dir(&config);
        let store = JsonKeyValueStore::new(&data_dir)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let id_scheme = config.id_scheme.parse().unwrap_or_else(|err: String| {
            warn!(error = %err, "falling back to timestamp ids");
            IdScheme::Timestamp
        });
        let ids = id_scheme.generator(Arc::clone(&clock));
        let manager = LeaveManager::open(
            Box::new(store),
            HolidayCalendar::india_2025(),
            clock,
            ids,
        )
        .with_sink(Arc::new(output::TerminalNotifier));
        info!(data_dir = %data_dir.display(), ?mode, %id_scheme, "leave planner shell started");

        let context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            manager,
            config_manager,
            config,
            last_suggestions: Vec::new(),
            last_command: None,
            running: true,
            theme: ColorfulTheme::default(),
        };
        context.report_load();
        Ok(context)
    }

    pub(crate) fn prompt(&self) -> String {
        if self.manager.employee().is_configured() {
            format!("leave [{}]> ", self.manager.balance())
        } else {
            "leave> ".to_string()
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn default_priority(&self) -> LeavePriority {
        self.config
            .default_priority
            .parse()
            .unwrap_or(LeavePriority::ClFirst)
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    fn report_load(&self) {
        for warning in self.manager.load_warnings() {
            output::warning(warning);
        }
        for drift in self.manager.audit() {
            output::warning(drift);
        }
        if !self.manager.employee().is_configured() {
            output::hint(
                "Profile not configured. Run `setup new <joining month>` or `setup existing`.",
            );
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|definition| definition.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_ascii_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Yes/no prompt. Script mode always answers yes.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) => {
                output::error(format!("{}: {}", err.title(), err));
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn print_warning(&self, message: &str) {
        output::warning(message);
    }
}

/// Unwraps a manager result whose failure the notifier has already printed.
pub(crate) fn settled<T>(result: Result<T, CoreError>) -> Option<T> {
    result.ok()
}
