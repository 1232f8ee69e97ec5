use leave_config::Config;

use crate::cli::args;
use crate::cli::core::{CliMode, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

const CONFIG_USAGE: &str = "config show | config set <key> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change preferences",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|value| value.to_ascii_lowercase()).as_deref() {
        None | Some("show") => show_config(context),
        Some("set") => {
            let key = args::required(args, 1, CONFIG_USAGE)?.to_ascii_lowercase();
            let value = args::required(args, 2, CONFIG_USAGE)?;
            context.config.set(&key, value)?;
            context.persist_config()?;
            if key == "ui_color_enabled" {
                output::set_color_enabled(
                    context.config.ui_color_enabled && context.mode == CliMode::Interactive,
                );
            }
            output::success(format!("Configuration updated: {key} = {}", context.config.get(&key)?));
            if matches!(key.as_str(), "data_dir" | "log_filter" | "id_scheme") {
                output::hint("Restart the shell for this setting to take effect.");
            }
            Ok(())
        }
        Some(_) => Err(args::usage_error(CONFIG_USAGE)),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for key in Config::KEYS {
        output::detail(format!("{:<18} {}", key, context.config.get(key)?));
    }
    output::detail(format!(
        "{:<18} {}",
        "config file",
        context.config_manager.config_path().display()
    ));
    output::detail(format!(
        "{:<18} {}",
        "data directory",
        context.config_manager.data_dir(&context.config).display()
    ));
    Ok(())
}
