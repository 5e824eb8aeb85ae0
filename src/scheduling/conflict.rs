//! Conflict detection for conflict-controlled locations
//!
//! A conflict is derived, never persisted: the candidate slot is compared
//! against existing bookings at the same location and calendar day using
//! half-open interval semantics. Only the first overlapping booking is
//! reported; the confirmation-dialog UX shows one blocker at a time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Appointment;
use crate::scheduling::time::{TimeOfDay, TimeSlot};
use crate::store::MemoryStore;
use crate::utils::errors::{Result, TeamCalError};
use crate::utils::logging::log_conflict_check;

/// The booking blocking a candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub appointment_id: Uuid,
    pub title: String,
    pub slot: TimeSlot,
}

impl Conflict {
    pub fn from_appointment(appointment: &Appointment, slot: TimeSlot) -> Self {
        Self {
            appointment_id: appointment.id,
            title: appointment.title.clone(),
            slot,
        }
    }
}

/// Tagged result of an atomic schedule attempt. A conflict is a decision
/// point for the caller, not a failure.
#[derive(Debug, Clone)]
pub enum ScheduleOutcome {
    Scheduled(Appointment),
    Conflict(Conflict),
}

impl ScheduleOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, ScheduleOutcome::Scheduled(_))
    }
}

/// Read-only conflict checker.
///
/// This is the pre-flight check views run while the user is still
/// editing. It is not atomic against concurrent writers; the store
/// re-runs the same test under its write lock when the mutation
/// commits, so this result is a UX hint only.
#[derive(Clone)]
pub struct ConflictResolver {
    store: MemoryStore,
}

impl ConflictResolver {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Check whether `[start, end)` at `location_id` on `date` collides
    /// with an existing booking, excluding `exclude` when editing.
    ///
    /// Locations without conflict control never report a conflict. When
    /// conflict control is on, both times are required before the query
    /// runs.
    pub async fn check_conflict(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        start: Option<TimeOfDay>,
        end: Option<TimeOfDay>,
        exclude: Option<Uuid>,
    ) -> Result<Option<Conflict>> {
        let location = self
            .store
            .get_location(location_id)
            .await
            .ok_or(TeamCalError::LocationNotFound { location_id })?;

        if !location.has_conflict_control {
            return Ok(None);
        }

        let candidate = match (start, end) {
            (Some(start), Some(end)) => TimeSlot::new(start, end)?,
            _ => {
                return Err(TeamCalError::Validation(format!(
                    "Location '{}' requires start and end times",
                    location.name
                )));
            }
        };

        let existing = self.store.appointments_at(location_id, date, exclude).await;
        let conflict = first_conflict(&candidate, &existing);
        log_conflict_check(
            location_id,
            &date.to_string(),
            conflict.is_some(),
            conflict.as_ref().map(|c| c.title.as_str()),
        );
        Ok(conflict)
    }
}

/// First booking whose slot overlaps the candidate, in store order.
/// Bookings without a complete slot cannot conflict.
pub fn first_conflict(candidate: &TimeSlot, existing: &[Appointment]) -> Option<Conflict> {
    existing.iter().find_map(|appointment| {
        let slot = appointment.slot()?;
        if candidate.overlaps(&slot) {
            Some(Conflict::from_appointment(appointment, slot))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentPlace;
    use chrono::Utc;

    fn booking(title: &str, start: &str, end: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: Some(start.parse().unwrap()),
            end_time: Some(end.parse().unwrap()),
            type_value: "meeting".to_string(),
            description: None,
            created_by: Uuid::new_v4(),
            place: AppointmentPlace::Managed(Uuid::new_v4()),
            organizer_only: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(start.parse().unwrap(), end.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_first_conflict_reports_overlap() {
        let existing = vec![booking("Standup", "09:00", "09:15")];
        let conflict = first_conflict(&slot("09:10", "09:30"), &existing).unwrap();
        assert_eq!(conflict.title, "Standup");
        assert_eq!(conflict.slot, slot("09:00", "09:15"));
    }

    #[test]
    fn test_adjacent_bookings_do_not_conflict() {
        let existing = vec![booking("Standup", "09:00", "09:15")];
        assert!(first_conflict(&slot("09:15", "09:30"), &existing).is_none());
    }

    #[test]
    fn test_only_first_match_is_reported() {
        // both overlap the candidate; only the first comes back
        let existing = vec![
            booking("Standup", "09:00", "09:15"),
            booking("Planning", "09:00", "10:00"),
        ];
        let conflict = first_conflict(&slot("09:10", "09:30"), &existing).unwrap();
        assert_eq!(conflict.title, "Standup");
    }

    #[test]
    fn test_open_ended_bookings_cannot_conflict() {
        let mut open = booking("All hands", "09:00", "10:00");
        open.end_time = None;
        assert!(first_conflict(&slot("09:00", "09:30"), &[open]).is_none());
    }
}
