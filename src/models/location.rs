//! Location model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A managed, bookable location.
///
/// `has_conflict_control` gates strict slot validation: when set, every
/// appointment booked here must carry both start and end times and the
/// conflict resolver rejects overlapping bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub has_conflict_control: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub color: String,
    pub has_conflict_control: bool,
}
