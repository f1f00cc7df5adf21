//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging helpers
//! shared by the main service and the stats server.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer of the log file; it must be
/// held for the lifetime of the process.
pub fn init_logging(
    config: &LoggingConfig,
    service_name: &str,
) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender =
        tracing_appender::rolling::daily(&config.file_path, format!("{service_name}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized for {} with level: {}", service_name, config.level);
    Ok(guard)
}

/// Log event moderation decisions with structured data
pub fn log_moderation(event_id: i64, action: &str, new_state: &str) {
    info!(
        event_id = event_id,
        action = action,
        new_state = new_state,
        "Event moderated"
    );
}

/// Log admin actions against other users' content
pub fn log_admin_action(action: &str, target: &str, target_id: i64) {
    warn!(
        action = action,
        target = target,
        target_id = target_id,
        "Admin action performed"
    );
}
