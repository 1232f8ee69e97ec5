use leave_core::{
    CombinedApplication, LeaveApplication, LeavePriority, LeaveTypeSelection, PlanService,
};
use leave_domain::{calendar, LeaveRequest, LeaveStatus, LeaveType};

use crate::cli::args;
use crate::cli::core::{settled, CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

const REQUEST_USAGE: &str = "request <PL|CL|RH> <start> <end> [reason]";
const COMBINED_USAGE: &str = "combined <types e.g. pl,cl,rh> <start> <end> [priority] [reason]";
const DRAFT_USAGE: &str = "draft <PL|CL|RH> <start> <end> [reason]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "request",
            "Apply for leave; approved and debited at once",
            REQUEST_USAGE,
            cmd_request,
        ),
        CommandDefinition::new(
            "combined",
            "Apply for one range split across several leave types",
            COMBINED_USAGE,
            cmd_combined,
        ),
        CommandDefinition::new(
            "draft",
            "Record a pending leave to confirm later",
            DRAFT_USAGE,
            cmd_draft,
        ),
        CommandDefinition::new(
            "history",
            "Show leave history grouped by month",
            "history [pending]",
            cmd_history,
        ),
        CommandDefinition::new(
            "confirm",
            "Confirm a pending leave and debit the balance",
            "confirm <id>",
            cmd_confirm,
        ),
        CommandDefinition::new(
            "delete",
            "Delete a pending leave",
            "delete <id>",
            cmd_delete,
        ),
    ]
}

fn parse_application(args: &[&str], usage: &str) -> Result<LeaveApplication, CommandError> {
    let leave_type: LeaveType = args::parsed(args::required(args, 0, usage)?)?;
    let start = args::date(args::required(args, 1, usage)?)?;
    let end = args::date(args::required(args, 2, usage)?)?;
    let mut application = LeaveApplication::new(leave_type, start, end);
    if let Some(reason) = args::text_from(args, 3) {
        application = application.with_reason(reason);
    }
    Ok(application)
}

fn cmd_request(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let application = parse_application(args, REQUEST_USAGE)?;
    if application.leave_type == LeaveType::Paid {
        let notice = PlanService::weekend_notice(application.start_date, application.end_date);
        if let Some(notice) = notice {
            output::info(notice);
        }
    }
    if let Some(id) = settled(context.manager.request_leave(&application)) {
        print_booked(context, &[id]);
    }
    Ok(())
}

fn cmd_combined(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let selection: LeaveTypeSelection = args::parsed(args::required(args, 0, COMBINED_USAGE)?)?;
    let start_date = args::date(args::required(args, 1, COMBINED_USAGE)?)?;
    let end_date = args::date(args::required(args, 2, COMBINED_USAGE)?)?;

    // The priority is optional; anything else starts the reason.
    let (priority, reason_index) = match args.get(3).map(|value| value.parse::<LeavePriority>()) {
        Some(Ok(priority)) => (priority, 4),
        _ => (context.default_priority(), 3),
    };
    let application = CombinedApplication {
        start_date,
        end_date,
        selection,
        priority,
        reason: args::text_from(args, reason_index),
    };
    if let Some(ids) = settled(context.manager.request_combined(&application)) {
        print_booked(context, &ids);
    }
    Ok(())
}

fn cmd_draft(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let application = parse_application(args, DRAFT_USAGE)?;
    if let Some(id) = settled(context.manager.add_planned_leave(&application)) {
        print_booked(context, &[id]);
        output::hint("Use `confirm <id>` or `delete <id>` to settle it.");
    }
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let pending_only = args
        .first()
        .is_some_and(|value| value.eq_ignore_ascii_case("pending"));

    if pending_only {
        let pending = context.manager.pending();
        output::section(format!("Pending Leaves ({})", pending.len()));
        if pending.is_empty() {
            output::detail("Nothing waiting for confirmation");
        }
        for request in &pending {
            output::detail(request_line(request));
        }
        return Ok(());
    }

    let groups = context.manager.history();
    if groups.is_empty() {
        output::info("No leave history yet.");
    }
    for group in &groups {
        output::section(&group.label);
        for request in &group.requests {
            output::detail(request_line(request));
        }
    }
    Ok(())
}

fn cmd_confirm(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = args::required(args, 0, "confirm <id>")?;
    settled(context.manager.confirm_leave(id));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = args::required(args, 0, "delete <id>")?;
    settled(context.manager.delete_leave(id));
    Ok(())
}

pub(crate) fn print_booked(context: &ShellContext, ids: &[String]) {
    for id in ids {
        if let Some(request) = context.manager.request(id) {
            output::detail(request_line(request));
        }
    }
    output::detail(format!("Balance: {}", context.manager.balance()));
}

pub(crate) fn request_line(request: &LeaveRequest) -> String {
    let span = if request.start_date == request.end_date {
        calendar::long_label(request.start_date)
    } else {
        format!(
            "{} to {}",
            calendar::long_label(request.start_date),
            calendar::long_label(request.end_date)
        )
    };
    let status = match request.status {
        LeaveStatus::Pending => format!("{} (confirm or delete)", request.status),
        status => status.to_string(),
    };
    let mut line = format!(
        "[{}] {} {} ({} day(s)) {}",
        request.id, request.leave_type, span, request.days, status
    );
    if let Some(reason) = &request.reason {
        line.push_str(&format!(" - {reason}"));
    }
    line
}
