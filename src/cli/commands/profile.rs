use leave_domain::{month_index, EmployeeClass, LeaveBalance};

use crate::cli::args;
use crate::cli::core::{settled, CommandError, CommandResult, ShellContext};
use crate::cli::output;

use super::CommandDefinition;

const SETUP_USAGE: &str = "setup new <joining month> | setup existing [used-pl used-cl used-rh]";
const USED_USAGE: &str = "used <pl> <cl> <rh>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "setup",
            "Set joining month or mark as existing employee",
            SETUP_USAGE,
            cmd_setup,
        ),
        CommandDefinition::new(
            "used",
            "Record leave taken before tracking started",
            USED_USAGE,
            cmd_used,
        ),
        CommandDefinition::new("reset", "Erase all leave data", "reset", cmd_reset),
    ]
}

fn cmd_setup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind = args::required(args, 0, SETUP_USAGE)?;
    let (class, used) = match kind.to_ascii_lowercase().as_str() {
        "new" => {
            let month = args::required(args, 1, SETUP_USAGE)?;
            let index = month_index(month).ok_or_else(|| {
                CommandError::InvalidArguments(format!("`{month}` is not a month"))
            })?;
            (EmployeeClass::NewJoiner { month: index }, None)
        }
        "existing" => {
            let used = match args.len() {
                1 => None,
                4 => Some(parse_balance(&args[1..])?),
                _ => return Err(args::usage_error(SETUP_USAGE)),
            };
            (EmployeeClass::Existing, used)
        }
        _ => return Err(args::usage_error(SETUP_USAGE)),
    };

    context.last_suggestions.clear();
    settled(context.manager.configure_employee(class, used));
    Ok(())
}

fn cmd_used(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() != 3 {
        return Err(args::usage_error(USED_USAGE));
    }
    let used = parse_balance(args)?;
    settled(context.manager.add_used_leaves(used));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.confirm("Erase every leave record and reset balances?")? {
        output::info("Reset cancelled.");
        return Ok(());
    }
    context.last_suggestions.clear();
    context.manager.reset_all_data();
    Ok(())
}

fn parse_balance(values: &[&str]) -> Result<LeaveBalance, CommandError> {
    Ok(LeaveBalance::new(
        args::number(values[0], "PL")?,
        args::number(values[1], "CL")?,
        args::number(values[2], "RH")?,
    ))
}
