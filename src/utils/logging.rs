//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the CampusEvents application.

use std::sync::OnceLock;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

// Keeps the non-blocking appender flushing for the process lifetime
static APPENDER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "campus-events.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = APPENDER_GUARD.set(guard);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log a derived-stats refresh outcome. Failed refreshes are warnings,
/// never errors surfaced to the caller.
pub fn log_stats_refresh(owner: &str, owner_id: i64, success: bool, error: Option<&str>) {
    if success {
        info!(owner = owner, owner_id = owner_id, "Derived stats refreshed");
    } else {
        warn!(
            owner = owner,
            owner_id = owner_id,
            error = error,
            "Derived stats refresh failed; counters will converge on the next trigger"
        );
    }
}
