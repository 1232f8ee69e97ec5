mod args;
pub mod commands;
pub mod core;
mod help;
pub mod output;
mod shell;
pub mod system_clock;

pub use shell::{run_cli, SCRIPT_ENV};
