//! Change-feed event types
//!
//! The store publishes a row-level event for every committed mutation.
//! Delivery is at-least-once and unordered relative to reads issued
//! before the write became durable, so consumers must recompute state
//! from the store instead of applying deltas.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tables covered by the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Appointments,
    Attendees,
    Locations,
    AppointmentTypes,
    Sectors,
    Profiles,
    Messages,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Appointments => "appointments",
            Table::Attendees => "attendees",
            Table::Locations => "locations",
            Table::AppointmentTypes => "appointment_types",
            Table::Sectors => "sectors",
            Table::Profiles => "profiles",
            Table::Messages => "messages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// One row-level mutation event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    /// Primary row id (appointment id for attendee rows).
    pub row_id: Uuid,
    /// User the row belongs to, when the table has one. Lets
    /// subscribers filter "attendee rows for this user".
    pub user_id: Option<Uuid>,
}

/// Column predicate for a filtered subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub table: Option<Table>,
    pub user_id: Option<Uuid>,
}

impl EventFilter {
    pub fn table(table: Table) -> Self {
        Self {
            table: Some(table),
            user_id: None,
        }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if let Some(table) = self.table {
            if event.table != table {
                return false;
            }
        }
        if let Some(user_id) = self.user_id {
            if event.user_id != Some(user_id) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_table_and_user() {
        let user = Uuid::new_v4();
        let event = ChangeEvent {
            table: Table::Attendees,
            kind: ChangeKind::Update,
            row_id: Uuid::new_v4(),
            user_id: Some(user),
        };

        assert!(EventFilter::default().matches(&event));
        assert!(EventFilter::table(Table::Attendees).matches(&event));
        assert!(!EventFilter::table(Table::Appointments).matches(&event));

        let for_user = EventFilter {
            table: Some(Table::Attendees),
            user_id: Some(user),
        };
        assert!(for_user.matches(&event));

        let other_user = EventFilter {
            table: None,
            user_id: Some(Uuid::new_v4()),
        };
        assert!(!other_user.matches(&event));
    }
}
