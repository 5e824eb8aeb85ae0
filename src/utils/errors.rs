//! Error handling for TeamCal
//!
//! This module defines the main error types used throughout the scheduling
//! engine and provides a unified error handling strategy.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for TeamCal operations
#[derive(Error, Debug)]
pub enum TeamCalError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Location not found: {location_id}")]
    LocationNotFound { location_id: Uuid },

    #[error("Appointment not found: {appointment_id}")]
    AppointmentNotFound { appointment_id: Uuid },

    #[error("Attendee not found: appointment {appointment_id}, user {user_id}")]
    AttendeeNotFound { appointment_id: Uuid, user_id: Uuid },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Partial write on appointment {appointment_id}, compensated by rollback: {reason}")]
    PartialWrite { appointment_id: Uuid, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Change feed lagged, {skipped} events dropped")]
    SyncLagged { skipped: u64 },

    #[error("Change feed closed")]
    SyncClosed,
}

impl From<tokio::sync::broadcast::error::RecvError> for TeamCalError {
    fn from(err: tokio::sync::broadcast::error::RecvError) -> Self {
        use tokio::sync::broadcast::error::RecvError;
        match err {
            RecvError::Lagged(skipped) => TeamCalError::SyncLagged { skipped },
            RecvError::Closed => TeamCalError::SyncClosed,
        }
    }
}

/// Result type alias for TeamCal operations
pub type Result<T> = std::result::Result<T, TeamCalError>;

impl TeamCalError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TeamCalError::Validation(_) => false,
            TeamCalError::LocationNotFound { .. } => false,
            TeamCalError::AppointmentNotFound { .. } => false,
            TeamCalError::AttendeeNotFound { .. } => false,
            TeamCalError::InvalidStateTransition { .. } => false,
            TeamCalError::PermissionDenied(_) => false,
            TeamCalError::PartialWrite { .. } => true,
            TeamCalError::Config(_) => false,
            TeamCalError::Serialization(_) => false,
            TeamCalError::Io(_) => true,
            TeamCalError::SyncLagged { .. } => true,
            TeamCalError::SyncClosed => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TeamCalError::Config(_) => ErrorSeverity::Critical,
            TeamCalError::SyncClosed => ErrorSeverity::Critical,
            TeamCalError::PermissionDenied(_) => ErrorSeverity::Warning,
            TeamCalError::SyncLagged { .. } => ErrorSeverity::Warning,
            TeamCalError::Validation(_) => ErrorSeverity::Info,
            TeamCalError::InvalidStateTransition { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(
            TeamCalError::Validation("empty title".to_string()).severity(),
            ErrorSeverity::Info
        );
        assert_eq!(
            TeamCalError::Config("missing store section".to_string()).severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            TeamCalError::SyncLagged { skipped: 3 }.severity(),
            ErrorSeverity::Warning
        );
    }

    #[test]
    fn test_feed_errors_map_to_sync_variants() {
        use tokio::sync::broadcast::error::RecvError;

        assert!(matches!(
            TeamCalError::from(RecvError::Lagged(4)),
            TeamCalError::SyncLagged { skipped: 4 }
        ));
        assert!(matches!(
            TeamCalError::from(RecvError::Closed),
            TeamCalError::SyncClosed
        ));
    }

    #[test]
    fn test_recoverability() {
        assert!(TeamCalError::SyncLagged { skipped: 1 }.is_recoverable());
        assert!(!TeamCalError::Validation("bad time".to_string()).is_recoverable());
        assert!(TeamCalError::PartialWrite {
            appointment_id: Uuid::new_v4(),
            reason: "attendee batch rejected".to_string()
        }
        .is_recoverable());
    }
}
