//! Scheduling engine module
//!
//! Time arithmetic, conflict detection, view-model aggregation, and the
//! filter engine.

pub mod time;
pub mod conflict;
pub mod aggregate;
pub mod filter;

pub use time::{TimeOfDay, TimeSlot, DateWindow, day_window, week_window, month_window};
pub use conflict::{Conflict, ConflictResolver, ScheduleOutcome, first_conflict};
pub use aggregate::{AppointmentView, AttendeeView, LocationRef, build_view, build_views};
pub use filter::{ScheduleFilter, UserRole, apply as apply_filter};
