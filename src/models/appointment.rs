//! Appointment model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scheduling::time::{TimeOfDay, TimeSlot};

/// Where an appointment takes place. A managed location and a free-text
/// external location are mutually exclusive; having neither is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AppointmentPlace {
    #[default]
    None,
    Managed(Uuid),
    External(String),
}

impl AppointmentPlace {
    pub fn location_id(&self) -> Option<Uuid> {
        match self {
            AppointmentPlace::Managed(id) => Some(*id),
            _ => None,
        }
    }

    pub fn external_text(&self) -> Option<&str> {
        match self {
            AppointmentPlace::External(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub type_value: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub place: AppointmentPlace,
    pub organizer_only: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Time slot of the appointment, when both endpoints are set.
    /// Open-ended and point-in-time appointments have no slot.
    pub fn slot(&self) -> Option<TimeSlot> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Some(TimeSlot { start, end }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub type_value: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub place: AppointmentPlace,
    pub organizer_only: bool,
    /// Users to invite as pending attendees; duplicates are collapsed.
    pub attendee_user_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<Option<TimeOfDay>>,
    pub end_time: Option<Option<TimeOfDay>>,
    pub type_value: Option<String>,
    pub description: Option<Option<String>>,
    pub place: Option<AppointmentPlace>,
    pub organizer_only: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_is_mutually_exclusive_by_construction() {
        let managed = AppointmentPlace::Managed(Uuid::new_v4());
        assert!(managed.location_id().is_some());
        assert!(managed.external_text().is_none());

        let external = AppointmentPlace::External("Client office".to_string());
        assert!(external.location_id().is_none());
        assert_eq!(external.external_text(), Some("Client office"));

        let none = AppointmentPlace::None;
        assert!(none.location_id().is_none());
        assert!(none.external_text().is_none());
    }

    #[test]
    fn test_slot_requires_both_endpoints() {
        let mut appointment = Appointment {
            id: Uuid::new_v4(),
            title: "Standup".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: Some("09:00".parse().unwrap()),
            end_time: None,
            type_value: "meeting".to_string(),
            description: None,
            created_by: Uuid::new_v4(),
            place: AppointmentPlace::None,
            organizer_only: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(appointment.slot().is_none());

        appointment.end_time = Some("09:15".parse().unwrap());
        let slot = appointment.slot().unwrap();
        assert_eq!(slot.start.to_string(), "09:00");
        assert_eq!(slot.end.to_string(), "09:15");
    }
}
