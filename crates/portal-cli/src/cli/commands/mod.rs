//! CLI command handlers.

use portal_core::config::Config;
use portal_core::logging;
use tracing_appender::non_blocking::WorkerGuard;

pub mod config;
pub mod session;
pub mod ui;

/// Starts file logging. Logging is best-effort; commands run without it.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    match logging::init(config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e:#}");
            None
        }
    }
}
