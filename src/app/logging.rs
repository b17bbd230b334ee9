//! Logging configuration and initialization
//!
//! The library only emits `tracing` events; the `gap` binary installs the
//! subscriber here. Logs go to stderr; stdout carries command output.

use crate::app::config::AppConfig;
use tracing::debug;

/// Initialize tracing for the `gap` binary
pub fn init_logging(config: &AppConfig) {
    let filter = config.log_level();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbose >= 2)
        .with_line_number(config.verbose >= 3)
        .init();

    if config.verbose == 0 {
        debug!("Log filter '{}' from configuration", filter);
    } else {
        debug!("Log filter '{}' from -v x{}", filter, config.verbose);
    }
}
