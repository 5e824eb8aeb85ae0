//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TeamCal scheduling engine.

use tracing::{info, warn, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer for the rolling log
/// file; the caller must hold it for the lifetime of the process or
/// file output is silently dropped.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "teamcal.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log appointment lifecycle actions with structured data
pub fn log_appointment_action(appointment_id: Uuid, action: &str, user_id: Uuid, details: Option<&str>) {
    info!(
        appointment_id = %appointment_id,
        action = action,
        user_id = %user_id,
        details = details,
        "Appointment action performed"
    );
}

/// Log conflict check results
pub fn log_conflict_check(location_id: Uuid, date: &str, conflicted: bool, blocking_title: Option<&str>) {
    if conflicted {
        warn!(
            location_id = %location_id,
            date = date,
            blocking_title = blocking_title,
            "Conflict check: slot already booked"
        );
    } else {
        debug!(location_id = %location_id, date = date, "Conflict check: slot free");
    }
}

/// Log invitation state changes
pub fn log_invitation_transition(appointment_id: Uuid, user_id: Uuid, from: &str, to: &str) {
    info!(
        appointment_id = %appointment_id,
        user_id = %user_id,
        from = from,
        to = to,
        "Invitation status changed"
    );
}

/// Log snapshot recomputations triggered by the change feed
pub fn log_snapshot_refresh(table: &str, appointments: usize, duration_ms: u64) {
    debug!(
        table = table,
        appointments = appointments,
        duration_ms = duration_ms,
        "Snapshot recomputed"
    );
}
