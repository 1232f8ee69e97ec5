pub mod build_info;

use tracing_subscriber::{fmt, EnvFilter};

/// Directive used when neither `RUST_LOG` nor the config sets a filter.
pub const DEFAULT_LOG_FILTER: &str = "leave_planner=info,leave_core=warn";

/// Installs the global subscriber. `RUST_LOG` wins over `filter`.
///
/// Logs go to stderr so script-mode stdout stays clean.
pub fn init_tracing(filter: Option<&str>) {
    let directive = filter.unwrap_or(DEFAULT_LOG_FILTER);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Another subscriber may already be installed by a test harness.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
