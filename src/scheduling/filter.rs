//! Scheduling filter engine
//!
//! Derives each view's visible subset of the shared snapshot. Every
//! predicate is independently optional (`None` / empty selection is the
//! "all" sentinel) and active predicates combine with logical AND, so
//! evaluation order never changes the result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{AttendeeStatus, Profile};
use crate::scheduling::aggregate::AppointmentView;

/// Role restriction applied together with a selected user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    All,
    Organizer,
    Participant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFilter {
    /// Empty selection means unrestricted.
    pub sector_ids: Vec<Uuid>,
    pub event_type: Option<String>,
    pub location_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    /// Ignored while no user is selected.
    pub user_role: UserRole,
}

impl ScheduleFilter {
    pub fn matches(&self, view: &AppointmentView, profiles: &HashMap<Uuid, Profile>) -> bool {
        self.matches_sector(view, profiles)
            && self.matches_type(view)
            && self.matches_location(view)
            && self.matches_user(view)
    }

    fn matches_sector(&self, view: &AppointmentView, profiles: &HashMap<Uuid, Profile>) -> bool {
        if self.sector_ids.is_empty() {
            return true;
        }
        // union of organizer and attendee sector memberships
        let mut participants = vec![view.created_by];
        participants.extend(view.attendees.iter().map(|a| a.user_id));
        participants.iter().any(|user_id| {
            profiles
                .get(user_id)
                .map(|p| p.belongs_to_any(&self.sector_ids))
                .unwrap_or(false)
        })
    }

    fn matches_type(&self, view: &AppointmentView) -> bool {
        match &self.event_type {
            Some(value) => view.type_value == *value,
            None => true,
        }
    }

    fn matches_location(&self, view: &AppointmentView) -> bool {
        match self.location_id {
            Some(id) => view.location.as_ref().map(|l| l.id) == Some(id),
            None => true,
        }
    }

    fn matches_user(&self, view: &AppointmentView) -> bool {
        let Some(user_id) = self.user_id else {
            // no user selected disables role filtering regardless of
            // its stored value
            return true;
        };
        let organizes = view.created_by == user_id;
        let participates = view
            .attendees
            .iter()
            .any(|a| a.user_id == user_id && a.status != AttendeeStatus::Declined);
        match self.user_role {
            UserRole::All => organizes || participates,
            UserRole::Organizer => organizes,
            UserRole::Participant => participates,
        }
    }
}

/// Apply a filter over the shared snapshot.
pub fn apply(
    views: &[AppointmentView],
    filter: &ScheduleFilter,
    profiles: &HashMap<Uuid, Profile>,
) -> Vec<AppointmentView> {
    views
        .iter()
        .filter(|view| filter.matches(view, profiles))
        .cloned()
        .collect()
}
