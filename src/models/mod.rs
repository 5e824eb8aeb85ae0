//! Data models module
//!
//! This module contains all data structures used throughout the engine

pub mod appointment;
pub mod attendee;
pub mod location;
pub mod appointment_type;
pub mod profile;
pub mod message;

// Re-export commonly used models
pub use appointment::{Appointment, AppointmentPlace, CreateAppointmentRequest, UpdateAppointmentRequest};
pub use attendee::{Attendee, AttendeeStatus};
pub use location::{Location, CreateLocationRequest};
pub use appointment_type::{AppointmentType, ResolvedLabel, ResolvedVia, resolve_label, resolve_color};
pub use profile::{Profile, Sector, UpdateProfileRequest};
pub use message::Message;
