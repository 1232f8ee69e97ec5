use leave_core::{DayInfo, LeavePriority, LeaveTypeSelection, SearchOptions, WindowDay};
use leave_domain::calendar;

use crate::cli::args;
use crate::cli::core::{settled, CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::{leave::print_booked, CommandDefinition};

const PLAN_USAGE: &str = "plan <start> <end> [types e.g. pl,cl,rh]";
const USE_PLAN_USAGE: &str = "use-plan <number> [priority]";
const SEARCH_USAGE: &str = "search <days> [months] [--no-weekends] [--no-holidays]";
/// Ranges longer than this print a summary instead of a day-by-day strip.
const MAX_STRIP_DAYS: usize = 15;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "plan",
            "Suggest leave plans for a date range",
            PLAN_USAGE,
            cmd_plan,
        ),
        CommandDefinition::new(
            "use-plan",
            "Book a suggestion from the last `plan` as pending leave",
            USE_PLAN_USAGE,
            cmd_use_plan,
        ),
        CommandDefinition::new(
            "search",
            "Find the best windows for a number of days off",
            SEARCH_USAGE,
            cmd_search,
        ),
    ]
}

fn cmd_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let start = args::date(args::required(args, 0, PLAN_USAGE)?)?;
    let end = args::date(args::required(args, 1, PLAN_USAGE)?)?;
    let selection = match args.get(2) {
        Some(value) => args::parsed(value)?,
        None => LeaveTypeSelection::all(),
    };

    let suggestions = context.manager.suggest_plans(start, end, selection)?;
    output::section(format!(
        "Leave Suggestions {} to {} ({})",
        calendar::short_label(start),
        calendar::short_label(end),
        selection
    ));
    for (index, suggestion) in suggestions.iter().enumerate() {
        output::detail(format!("{}. {}", index + 1, suggestion.title));
        output::detail(format!("   {}", suggestion.description));
        output::detail(format!(
            "   {} day(s) off, {} leave day(s) needed",
            suggestion.days, suggestion.leaves_required
        ));
        if !suggestion.dates.is_empty() {
            let dates: Vec<String> = suggestion
                .dates
                .iter()
                .map(|date| calendar::short_label(*date))
                .collect();
            output::detail(format!("   Leave on: {}", dates.join(", ")));
        }
        if suggestion.day_details.len() <= MAX_STRIP_DAYS {
            for day in &suggestion.day_details {
                output::detail(format!(
                    "     {} {:<9} {}",
                    calendar::short_label(day.date),
                    day.day_name,
                    plan_day_tag(day, &selection)
                ));
            }
        }
        for warning in &suggestion.warnings {
            output::warning(warning);
        }
    }
    context.last_suggestions = suggestions;
    output::hint("Book one with `use-plan <number> [priority]`.");
    Ok(())
}

fn cmd_use_plan(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let number: usize = args::number(args::required(args, 0, USE_PLAN_USAGE)?, "plan number")?;
    let priority: LeavePriority = match args.get(1) {
        Some(value) => args::parsed(value)?,
        None => context.default_priority(),
    };
    let suggestion = number
        .checked_sub(1)
        .and_then(|index| context.last_suggestions.get(index))
        .cloned()
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "No suggestion #{number}. Run `plan <start> <end>` first."
            ))
        })?;

    if let Some(ids) = settled(context.manager.use_plan(&suggestion, priority)) {
        print_booked(context, &ids);
        context.last_suggestions.clear();
    }
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, flags) = args::split_flags(args);
    let days: u32 = args::number(args::required(&positional, 0, SEARCH_USAGE)?, "days")?;
    let months: u32 = match positional.get(1) {
        Some(value) => args::number(value, "months")?,
        None => context.config.look_ahead_months,
    };
    let mut options = SearchOptions::default();
    for flag in flags {
        match flag {
            "--no-weekends" => options.include_weekends = false,
            "--no-holidays" => options.include_public_holidays = false,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{other}`"
                )))
            }
        }
    }

    let windows = context.manager.search_windows(days, months, options)?;
    output::section(format!(
        "Best {days}-day windows in the next {months} month(s)"
    ));
    if windows.is_empty() {
        output::detail("No windows found");
    }
    for (index, window) in windows.iter().enumerate() {
        output::detail(format!(
            "{}. {} to {}",
            index + 1,
            calendar::long_label(window.start_date),
            calendar::long_label(window.end_date)
        ));
        output::detail(format!(
            "   {} leave day(s), {} weekend, {} holiday, efficiency {}",
            window.leave_days, window.weekend_days, window.holiday_days, window.efficiency
        ));
        let strip: Vec<String> = window.calendar_days.iter().map(window_day_tag).collect();
        output::detail(format!("   {}", strip.join(" | ")));
    }
    Ok(())
}

fn plan_day_tag(day: &DayInfo, selection: &LeaveTypeSelection) -> &'static str {
    if day.is_used {
        "booked"
    } else if day.is_holiday {
        "holiday"
    } else if day.is_weekend {
        "weekend"
    } else if day.needs_leave(selection) {
        if day.is_rh {
            "leave (RH)"
        } else {
            "leave"
        }
    } else {
        "working"
    }
}

fn window_day_tag(day: &WindowDay) -> String {
    let tag = if day.is_holiday {
        "holiday"
    } else if day.is_weekend {
        "weekend"
    } else if day.is_restricted_holiday {
        "RH"
    } else {
        "leave"
    };
    format!("{} {}", calendar::short_label(day.date), tag)
}
