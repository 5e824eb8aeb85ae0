//! Appointment view-model aggregation
//!
//! Joins raw appointment rows with attendee rows and the location,
//! type, and profile lookup tables into the one view-model every open
//! view renders from. Lookup misses degrade instead of failing: a gone
//! location becomes "no location", a gone type resolves through the
//! label chain, a gone profile leaves the attendee name empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    appointment_type::{resolve_color, resolve_label},
    Appointment, AppointmentType, Attendee, AttendeeStatus, Location, Profile,
};
use crate::scheduling::time::{TimeOfDay, TimeSlot};
use chrono::NaiveDate;

/// Resolved managed-location metadata on a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub has_conflict_control: bool,
}

/// One attendee as rendered in views, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeView {
    pub user_id: Uuid,
    pub status: AttendeeStatus,
    pub display_name: Option<String>,
}

/// The consistent per-appointment snapshot views render from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub type_value: String,
    pub type_label: String,
    pub type_color: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub location: Option<LocationRef>,
    pub external_location: Option<String>,
    pub organizer_only: bool,
    pub attendees: Vec<AttendeeView>,
}

impl AppointmentView {
    pub fn slot(&self) -> Option<TimeSlot> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Some(TimeSlot { start, end }),
            _ => None,
        }
    }
}

/// Build view-models for a set of appointments.
pub fn build_views(
    appointments: &[Appointment],
    attendees: &[Attendee],
    locations: &[Location],
    types: &[AppointmentType],
    profiles: &[Profile],
) -> Vec<AppointmentView> {
    appointments
        .iter()
        .map(|appointment| build_view(appointment, attendees, locations, types, profiles))
        .collect()
}

/// Build one view-model.
pub fn build_view(
    appointment: &Appointment,
    attendees: &[Attendee],
    locations: &[Location],
    types: &[AppointmentType],
    profiles: &[Profile],
) -> AppointmentView {
    // a stale location id degrades to "no location"
    let location = appointment
        .place
        .location_id()
        .and_then(|id| locations.iter().find(|l| l.id == id))
        .map(|l| LocationRef {
            id: l.id,
            name: l.name.clone(),
            color: l.color.clone(),
            has_conflict_control: l.has_conflict_control,
        });

    let resolved = resolve_label(&appointment.type_value, types);

    let attendee_views: Vec<AttendeeView> = attendees
        .iter()
        .filter(|a| a.appointment_id == appointment.id)
        .map(|a| AttendeeView {
            user_id: a.user_id,
            status: a.status,
            display_name: profiles
                .iter()
                .find(|p| p.user_id == a.user_id)
                .map(|p| p.display_name.clone()),
        })
        .collect();

    AppointmentView {
        id: appointment.id,
        title: appointment.title.clone(),
        date: appointment.date,
        start_time: appointment.start_time,
        end_time: appointment.end_time,
        type_value: appointment.type_value.clone(),
        type_label: resolved.label,
        type_color: resolve_color(&appointment.type_value, types),
        description: appointment.description.clone(),
        created_by: appointment.created_by,
        location,
        external_location: appointment.place.external_text().map(str::to_string),
        organizer_only: appointment.organizer_only,
        attendees: attendee_views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentPlace;
    use chrono::Utc;

    fn base_appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            title: "Planning".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: Some("14:00".parse().unwrap()),
            end_time: Some("15:00".parse().unwrap()),
            type_value: "meeting".to_string(),
            description: None,
            created_by: Uuid::new_v4(),
            place: AppointmentPlace::None,
            organizer_only: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_location_row_means_no_location() {
        let mut appointment = base_appointment();
        appointment.place = AppointmentPlace::Managed(Uuid::new_v4());
        let view = build_view(&appointment, &[], &[], &[], &[]);
        assert!(view.location.is_none());
        assert!(view.external_location.is_none());
    }

    #[test]
    fn test_orphan_type_value_resolves_through_alias() {
        let view = build_view(&base_appointment(), &[], &[], &[], &[]);
        assert_eq!(view.type_label, "Reunião");
        assert_eq!(view.type_value, "meeting");
    }

    #[test]
    fn test_attendees_keep_insertion_order_and_names() {
        let appointment = base_appointment();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let attendees = vec![
            Attendee {
                appointment_id: appointment.id,
                user_id: u1,
                status: AttendeeStatus::Pending,
                invited_at: Utc::now(),
            },
            Attendee {
                appointment_id: appointment.id,
                user_id: u2,
                status: AttendeeStatus::Accepted,
                invited_at: Utc::now(),
            },
        ];
        let profiles = vec![Profile {
            user_id: u2,
            display_name: "Ana".to_string(),
            sector_ids: vec![],
            avatar_url: None,
        }];

        let view = build_view(&appointment, &attendees, &[], &[], &profiles);
        assert_eq!(view.attendees.len(), 2);
        assert_eq!(view.attendees[0].user_id, u1);
        assert_eq!(view.attendees[0].display_name, None);
        assert_eq!(view.attendees[1].display_name, Some("Ana".to_string()));
    }

    #[test]
    fn test_external_location_carries_through() {
        let mut appointment = base_appointment();
        appointment.place = AppointmentPlace::External("Client office".to_string());
        let view = build_view(&appointment, &[], &[], &[], &[]);
        assert!(view.location.is_none());
        assert_eq!(view.external_location.as_deref(), Some("Client office"));
    }
}
