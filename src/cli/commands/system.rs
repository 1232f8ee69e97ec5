use leave_domain::calendar;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "status",
            "Show balance, usage and what is coming up",
            "status",
            cmd_status,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context.manager.dashboard();

    output::section("Leave Profile");
    output::detail(format!("Employee : {}", summary.employee));
    output::detail(format!("Balance  : {}", summary.balance));
    output::detail(format!("Pending  : {} request(s)", summary.pending));

    output::section("Usage");
    for usage in &summary.usage {
        output::detail(format!(
            "{}  used {:>2} of {:>2} ({} left)",
            usage.leave_type, usage.used, usage.entitlement, usage.remaining
        ));
    }

    output::section("Upcoming Holidays");
    if summary.upcoming_holidays.is_empty() {
        output::detail("No more holidays this year");
    }
    for holiday in &summary.upcoming_holidays {
        output::detail(format!(
            "{}  {} [{}]",
            calendar::long_label(holiday.date),
            holiday.name,
            holiday.kind
        ));
    }

    output::section("Upcoming Leaves");
    if summary.upcoming_leaves.is_empty() {
        output::detail("No upcoming leaves");
    }
    for request in &summary.upcoming_leaves {
        output::detail(format!(
            "{} {} to {} ({} day(s)) {}",
            request.leave_type,
            calendar::short_label(request.start_date),
            calendar::short_label(request.end_date),
            request.days,
            request.status
        ));
    }

    output::section("Selected Restricted Holidays");
    if summary.selected_rh.is_empty() {
        output::detail("None selected. Use `rh list` and `rh select <date>`.");
    }
    for holiday in &summary.selected_rh {
        output::detail(format!(
            "{}  {}",
            calendar::long_label(holiday.date),
            holiday.name
        ));
    }

    if !summary.employee.is_configured() {
        output::hint("Run `setup new <joining month>` or `setup existing` to set your entitlement.");
    }
    Ok(())
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Leave Planner {}", meta.version));
    output::detail(format!("Holidays     : {}", context.manager.holidays().year));
    output::detail(format!(
        "Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    output::detail(format!("Built at     : {}", meta.timestamp));
    output::detail(format!("Target       : {}", meta.target));
    output::detail(format!("Profile      : {}", meta.profile));
    output::detail(format!("Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
