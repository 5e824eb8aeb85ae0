//! TeamCal scheduling engine
//!
//! Appointment scheduling and conflict resolution for team calendars.
//! This library provides conflict-gated booking at managed locations,
//! attendee invitation lifecycle, view filtering, and change-feed driven
//! snapshot synchronization across open views.

pub mod config;
pub mod models;
pub mod scheduling;
pub mod services;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TeamCalError, Result};

// Re-export main components for easy access
pub use scheduling::{Conflict, ConflictResolver, ScheduleFilter, ScheduleOutcome};
pub use services::{AppointmentService, ServiceFactory, Snapshot, SyncService};
pub use store::{MemoryStore, StoreService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
