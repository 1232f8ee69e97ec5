use leave_domain::{calendar, HolidayFilter, RH_SELECTION_CAP};

use crate::cli::args;
use crate::cli::core::{settled, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

const RH_USAGE: &str = "rh list | rh select <date> | rh unselect <date>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "holidays",
            "List public holidays",
            "holidays [all|weekend|compulsory|additional|declared]",
            cmd_holidays,
        ),
        CommandDefinition::new(
            "rh",
            "List, select or unselect restricted holidays",
            RH_USAGE,
            cmd_rh,
        ),
    ]
}

fn cmd_holidays(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter: HolidayFilter = match args.first() {
        Some(value) => args::parsed(value)?,
        None => HolidayFilter::All,
    };
    let holidays = context.manager.holidays();
    let listed = holidays.filter(filter);

    output::section(format!("Holidays {}", holidays.year));
    if listed.is_empty() {
        output::detail("No holidays match this filter");
    }
    for holiday in listed {
        let marker = if holiday.weekend { " (weekend)" } else { "" };
        output::detail(format!(
            "{}  {:<10} {}{}",
            calendar::long_label(holiday.date),
            holiday.kind.to_string(),
            holiday.name,
            marker
        ));
    }
    Ok(())
}

fn cmd_rh(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let action = args.first().copied().unwrap_or("list");
    match action.to_ascii_lowercase().as_str() {
        "list" => {
            list_restricted(context);
            Ok(())
        }
        "select" => {
            let date = args::date(args::required(args, 1, RH_USAGE)?)?;
            settled(context.manager.select_restricted_holiday(date));
            Ok(())
        }
        "unselect" => {
            let date = args::date(args::required(args, 1, RH_USAGE)?)?;
            settled(context.manager.unselect_restricted_holiday(date));
            Ok(())
        }
        _ => Err(args::usage_error(RH_USAGE)),
    }
}

fn list_restricted(context: &ShellContext) {
    let ledger = context.manager.ledger();
    let holidays = context.manager.holidays();

    output::section(format!(
        "Restricted Holidays {} ({} of {} selected)",
        holidays.year,
        ledger.selected_rh.len(),
        RH_SELECTION_CAP
    ));
    for holiday in holidays.sorted_restricted() {
        let marker = if ledger.is_rh_selected(holiday.date) {
            "[x]"
        } else {
            "[ ]"
        };
        output::detail(format!(
            "{} {}  {}  {}",
            marker,
            calendar::format_iso(holiday.date),
            holiday.day,
            holiday.name
        ));
    }
}
