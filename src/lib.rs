#![doc(test(attr(deny(warnings))))]

//! Leave Planner wires the leave accounting crates into an interactive shell:
//! tracing setup, build metadata, and the `leave_planner_cli` command loop.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing once; `filter` replaces the default directive.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("Leave Planner tracing initialized.");
    });
}
