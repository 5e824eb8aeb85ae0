//! In-memory transactional store with a change feed
//!
//! Stand-in for the external relational store: tables behind one
//! `RwLock`, row-level mutations published on a broadcast channel.
//! The write lock is the atomicity boundary the scheduling layer
//! relies on; `put_appointment_checked` runs the conflict test and
//! the insert under the same lock so two concurrent schedulers can
//! never both pass.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentType, Attendee, AttendeeStatus, CreateLocationRequest, Location,
    Message, Profile, Sector, UpdateProfileRequest,
};
use crate::scheduling::conflict::{first_conflict, ScheduleOutcome};
use crate::scheduling::time::{DateWindow, TimeSlot};
use crate::store::change::{ChangeEvent, ChangeKind, Table};
use crate::utils::errors::{Result, TeamCalError};

#[derive(Debug, Default)]
struct Tables {
    appointments: HashMap<Uuid, Appointment>,
    /// Insertion order preserved for display.
    attendees: Vec<Attendee>,
    locations: HashMap<Uuid, Location>,
    appointment_types: Vec<AppointmentType>,
    sectors: Vec<Sector>,
    profiles: HashMap<Uuid, Profile>,
    messages: Vec<Message>,
    /// Tables the current caller has no write grant for. Stands in for
    /// the external store's row-level access control.
    write_denied: HashSet<Table>,
}

/// Shared handle to the store. Cheap to clone.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    feed: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new(channel_capacity: usize) -> Self {
        let (feed, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            feed,
        }
    }

    /// Subscribe to the change feed. At-least-once, unordered relative
    /// to reads issued before the write committed.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    /// Deny or restore write access to a table.
    pub async fn set_write_denied(&self, table: Table, denied: bool) {
        let mut tables = self.tables.write().await;
        if denied {
            tables.write_denied.insert(table);
        } else {
            tables.write_denied.remove(&table);
        }
    }

    fn publish(&self, event: ChangeEvent) {
        // No subscribers is fine; views may not be open yet.
        if let Err(e) = self.feed.send(event) {
            debug!(error = %e, "Change event dropped, no subscribers");
        }
    }

    fn check_write(tables: &Tables, table: Table) -> Result<()> {
        if tables.write_denied.contains(&table) {
            return Err(TeamCalError::PermissionDenied(format!(
                "No write grant for table {}",
                table.as_str()
            )));
        }
        Ok(())
    }

    // ---- appointments ----

    /// Validate managed-location placement. Returns the slot when the
    /// location enforces conflict control.
    fn validate_placement(tables: &Tables, appointment: &Appointment) -> Result<Option<TimeSlot>> {
        let Some(location_id) = appointment.place.location_id() else {
            return Ok(None);
        };
        let location = tables
            .locations
            .get(&location_id)
            .ok_or(TeamCalError::LocationNotFound { location_id })?;
        if !location.has_conflict_control {
            return Ok(None);
        }
        match appointment.slot() {
            Some(slot) => Ok(Some(slot)),
            None => Err(TeamCalError::Validation(format!(
                "Location '{}' requires start and end times",
                location.name
            ))),
        }
    }

    fn bookings_at(
        tables: &Tables,
        location_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Vec<Appointment> {
        let mut bookings: Vec<Appointment> = tables
            .appointments
            .values()
            .filter(|a| a.place.location_id() == Some(location_id) && a.date == date)
            .filter(|a| Some(a.id) != exclude)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| {
            (a.start_time, a.created_at).cmp(&(b.start_time, b.created_at))
        });
        bookings
    }

    /// Insert or replace an appointment, running the conflict test and
    /// the write under one lock. A reported conflict leaves the store
    /// untouched.
    pub async fn put_appointment_checked(
        &self,
        appointment: Appointment,
    ) -> Result<ScheduleOutcome> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Appointments)?;

        if let Some(candidate) = Self::validate_placement(&tables, &appointment)? {
            let location_id = appointment
                .place
                .location_id()
                .unwrap_or_default();
            let existing =
                Self::bookings_at(&tables, location_id, appointment.date, Some(appointment.id));
            if let Some(conflict) = first_conflict(&candidate, &existing) {
                return Ok(ScheduleOutcome::Conflict(conflict));
            }
        }

        let event = Self::store_appointment(&mut tables, appointment.clone());
        drop(tables);
        self.publish(event);
        Ok(ScheduleOutcome::Scheduled(appointment))
    }

    /// Insert or replace an appointment, skipping the conflict gate.
    /// Used after the caller explicitly confirmed a reported conflict.
    /// Placement validation still applies.
    pub async fn put_appointment_forced(&self, appointment: Appointment) -> Result<Appointment> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Appointments)?;
        Self::validate_placement(&tables, &appointment)?;
        let event = Self::store_appointment(&mut tables, appointment.clone());
        drop(tables);
        self.publish(event);
        Ok(appointment)
    }

    fn store_appointment(tables: &mut Tables, appointment: Appointment) -> ChangeEvent {
        let kind = if tables.appointments.contains_key(&appointment.id) {
            ChangeKind::Update
        } else {
            ChangeKind::Insert
        };
        let event = ChangeEvent {
            table: Table::Appointments,
            kind,
            row_id: appointment.id,
            user_id: Some(appointment.created_by),
        };
        tables.appointments.insert(appointment.id, appointment);
        event
    }

    pub async fn get_appointment(&self, id: Uuid) -> Option<Appointment> {
        self.tables.read().await.appointments.get(&id).cloned()
    }

    pub async fn list_appointments(&self) -> Vec<Appointment> {
        let tables = self.tables.read().await;
        let mut all: Vec<Appointment> = tables.appointments.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.date, a.start_time, a.created_at).cmp(&(b.date, b.start_time, b.created_at))
        });
        all
    }

    pub async fn appointments_in(&self, window: DateWindow) -> Vec<Appointment> {
        self.list_appointments()
            .await
            .into_iter()
            .filter(|a| window.contains(a.date))
            .collect()
    }

    /// Bookings at a managed location on a calendar day, ordered by
    /// start time, optionally excluding the appointment being edited.
    pub async fn appointments_at(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Vec<Appointment> {
        let tables = self.tables.read().await;
        Self::bookings_at(&tables, location_id, date, exclude)
    }

    /// Delete an appointment and cascade its attendee rows.
    pub async fn delete_appointment(&self, id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Appointments)?;
        let appointment = tables
            .appointments
            .remove(&id)
            .ok_or(TeamCalError::AppointmentNotFound { appointment_id: id })?;

        let mut events = vec![ChangeEvent {
            table: Table::Appointments,
            kind: ChangeKind::Delete,
            row_id: id,
            user_id: Some(appointment.created_by),
        }];
        tables.attendees.retain(|a| {
            if a.appointment_id == id {
                events.push(ChangeEvent {
                    table: Table::Attendees,
                    kind: ChangeKind::Delete,
                    row_id: id,
                    user_id: Some(a.user_id),
                });
                false
            } else {
                true
            }
        });
        drop(tables);
        for event in events {
            self.publish(event);
        }
        Ok(())
    }

    // ---- attendees ----

    /// Insert pending/requested rows for the given users. Duplicate ids
    /// in the input and pairs already present are skipped, so the call
    /// is idempotent per (appointment, user).
    pub async fn insert_attendees(
        &self,
        appointment_id: Uuid,
        user_ids: &[Uuid],
        status: AttendeeStatus,
    ) -> Result<Vec<Attendee>> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Attendees)?;
        let appointment = tables
            .appointments
            .get(&appointment_id)
            .ok_or(TeamCalError::AppointmentNotFound { appointment_id })?;
        if appointment.organizer_only {
            return Err(TeamCalError::Validation(
                "Organizer-only appointments cannot have attendees".to_string(),
            ));
        }

        let mut inserted = Vec::new();
        let mut seen: HashSet<Uuid> = tables
            .attendees
            .iter()
            .filter(|a| a.appointment_id == appointment_id)
            .map(|a| a.user_id)
            .collect();
        for &user_id in user_ids {
            if !seen.insert(user_id) {
                continue;
            }
            let attendee = Attendee {
                appointment_id,
                user_id,
                status,
                invited_at: Utc::now(),
            };
            tables.attendees.push(attendee.clone());
            inserted.push(attendee);
        }
        drop(tables);

        for attendee in &inserted {
            self.publish(ChangeEvent {
                table: Table::Attendees,
                kind: ChangeKind::Insert,
                row_id: appointment_id,
                user_id: Some(attendee.user_id),
            });
        }
        Ok(inserted)
    }

    pub async fn attendees_of(&self, appointment_id: Uuid) -> Vec<Attendee> {
        self.tables
            .read()
            .await
            .attendees
            .iter()
            .filter(|a| a.appointment_id == appointment_id)
            .cloned()
            .collect()
    }

    pub async fn attendees_for_user(&self, user_id: Uuid) -> Vec<Attendee> {
        self.tables
            .read()
            .await
            .attendees
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn list_attendees(&self) -> Vec<Attendee> {
        self.tables.read().await.attendees.clone()
    }

    /// Apply an invitation state transition. The state machine is
    /// enforced here, at the commit boundary.
    pub async fn update_attendee_status(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        target: AttendeeStatus,
    ) -> Result<Attendee> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Attendees)?;
        let row = tables
            .attendees
            .iter_mut()
            .find(|a| a.appointment_id == appointment_id && a.user_id == user_id)
            .ok_or(TeamCalError::AttendeeNotFound {
                appointment_id,
                user_id,
            })?;
        row.status = row.status.transition_to(target)?;
        let updated = row.clone();
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Attendees,
            kind: ChangeKind::Update,
            row_id: appointment_id,
            user_id: Some(user_id),
        });
        Ok(updated)
    }

    /// Remove one invitation row. Re-inviting after a decline goes
    /// through here plus a fresh insert.
    pub async fn remove_attendee(&self, appointment_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Attendees)?;
        let before = tables.attendees.len();
        tables
            .attendees
            .retain(|a| !(a.appointment_id == appointment_id && a.user_id == user_id));
        if tables.attendees.len() == before {
            return Err(TeamCalError::AttendeeNotFound {
                appointment_id,
                user_id,
            });
        }
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Attendees,
            kind: ChangeKind::Delete,
            row_id: appointment_id,
            user_id: Some(user_id),
        });
        Ok(())
    }

    /// Remove every attendee row of an appointment. Returns how many
    /// rows went away.
    pub async fn delete_attendees_for(&self, appointment_id: Uuid) -> Result<usize> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Attendees)?;
        let mut removed = Vec::new();
        tables.attendees.retain(|a| {
            if a.appointment_id == appointment_id {
                removed.push(a.user_id);
                false
            } else {
                true
            }
        });
        drop(tables);
        if !removed.is_empty() {
            warn!(
                appointment_id = %appointment_id,
                removed = removed.len(),
                "Attendee rows removed"
            );
        }
        for user_id in &removed {
            self.publish(ChangeEvent {
                table: Table::Attendees,
                kind: ChangeKind::Delete,
                row_id: appointment_id,
                user_id: Some(*user_id),
            });
        }
        Ok(removed.len())
    }

    // ---- locations ----

    pub async fn insert_location(&self, request: CreateLocationRequest) -> Result<Location> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Locations)?;
        let location = Location {
            id: Uuid::new_v4(),
            name: request.name,
            color: request.color,
            has_conflict_control: request.has_conflict_control,
        };
        tables.locations.insert(location.id, location.clone());
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Locations,
            kind: ChangeKind::Insert,
            row_id: location.id,
            user_id: None,
        });
        Ok(location)
    }

    pub async fn get_location(&self, id: Uuid) -> Option<Location> {
        self.tables.read().await.locations.get(&id).cloned()
    }

    pub async fn list_locations(&self) -> Vec<Location> {
        let mut all: Vec<Location> =
            self.tables.read().await.locations.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    // ---- appointment types ----

    pub async fn insert_appointment_type(&self, appointment_type: AppointmentType) -> Result<()> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::AppointmentTypes)?;
        let row_id = appointment_type.id;
        tables.appointment_types.push(appointment_type);
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::AppointmentTypes,
            kind: ChangeKind::Insert,
            row_id,
            user_id: None,
        });
        Ok(())
    }

    pub async fn list_appointment_types(&self) -> Vec<AppointmentType> {
        self.tables.read().await.appointment_types.clone()
    }

    // ---- sectors ----

    pub async fn insert_sector(&self, name: &str) -> Result<Sector> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Sectors)?;
        let sector = Sector {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        tables.sectors.push(sector.clone());
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Sectors,
            kind: ChangeKind::Insert,
            row_id: sector.id,
            user_id: None,
        });
        Ok(sector)
    }

    pub async fn list_sectors(&self) -> Vec<Sector> {
        self.tables.read().await.sectors.clone()
    }

    // ---- profiles ----

    pub async fn upsert_profile(&self, profile: Profile) -> Result<()> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Profiles)?;
        let kind = if tables.profiles.contains_key(&profile.user_id) {
            ChangeKind::Update
        } else {
            ChangeKind::Insert
        };
        let user_id = profile.user_id;
        tables.profiles.insert(user_id, profile);
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Profiles,
            kind,
            row_id: user_id,
            user_id: Some(user_id),
        });
        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Profile> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Profiles)?;
        let profile = tables
            .profiles
            .get_mut(&user_id)
            .ok_or_else(|| TeamCalError::Validation(format!("Unknown profile: {}", user_id)))?;
        if let Some(display_name) = request.display_name {
            profile.display_name = display_name;
        }
        if let Some(sector_ids) = request.sector_ids {
            profile.sector_ids = sector_ids;
        }
        if let Some(avatar_url) = request.avatar_url {
            profile.avatar_url = avatar_url;
        }
        let updated = profile.clone();
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Profiles,
            kind: ChangeKind::Update,
            row_id: user_id,
            user_id: Some(user_id),
        });
        Ok(updated)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Option<Profile> {
        self.tables.read().await.profiles.get(&user_id).cloned()
    }

    pub async fn list_profiles(&self) -> Vec<Profile> {
        self.tables.read().await.profiles.values().cloned().collect()
    }

    // ---- messages ----

    pub async fn insert_message(&self, recipient_id: Uuid, sender_id: Uuid) -> Result<Message> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Messages)?;
        let message = Message {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id,
            read: false,
            sent_at: Utc::now(),
        };
        tables.messages.push(message.clone());
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Messages,
            kind: ChangeKind::Insert,
            row_id: message.id,
            user_id: Some(recipient_id),
        });
        Ok(message)
    }

    pub async fn mark_message_read(&self, message_id: Uuid) -> Result<()> {
        let mut tables = self.tables.write().await;
        Self::check_write(&tables, Table::Messages)?;
        let message = tables
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| TeamCalError::Validation(format!("Unknown message: {}", message_id)))?;
        message.read = true;
        let recipient_id = message.recipient_id;
        drop(tables);
        self.publish(ChangeEvent {
            table: Table::Messages,
            kind: ChangeKind::Update,
            row_id: message_id,
            user_id: Some(recipient_id),
        });
        Ok(())
    }

    /// Unread count is always recomputed from rows, never maintained as
    /// a running counter.
    pub async fn unread_count(&self, user_id: Uuid) -> usize {
        self.tables
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.recipient_id == user_id && !m.read)
            .count()
    }

    pub async fn list_messages(&self) -> Vec<Message> {
        self.tables.read().await.messages.clone()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentPlace;
    use assert_matches::assert_matches;

    fn appointment_at(location_id: Uuid, start: &str, end: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            title: "Standup".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: Some(start.parse().unwrap()),
            end_time: Some(end.parse().unwrap()),
            type_value: "meeting".to_string(),
            description: None,
            created_by: Uuid::new_v4(),
            place: AppointmentPlace::Managed(location_id),
            organizer_only: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn controlled_location(store: &MemoryStore) -> Location {
        store
            .insert_location(CreateLocationRequest {
                name: "War room".to_string(),
                color: "#0ea5e9".to_string(),
                has_conflict_control: true,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_checked_insert_rejects_overlap_atomically() {
        let store = MemoryStore::default();
        let location = controlled_location(&store).await;

        let first = store
            .put_appointment_checked(appointment_at(location.id, "09:00", "09:15"))
            .await
            .unwrap();
        assert!(first.is_scheduled());

        let second = store
            .put_appointment_checked(appointment_at(location.id, "09:10", "09:30"))
            .await
            .unwrap();
        assert_matches!(second, ScheduleOutcome::Conflict(ref c) if c.title == "Standup");

        // the conflicting candidate was not written
        assert_eq!(store.list_appointments().await.len(), 1);
    }

    #[tokio::test]
    async fn test_checked_insert_requires_times_under_conflict_control() {
        let store = MemoryStore::default();
        let location = controlled_location(&store).await;

        let mut open_ended = appointment_at(location.id, "09:00", "10:00");
        open_ended.end_time = None;
        assert_matches!(
            store.put_appointment_checked(open_ended).await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_forced_insert_skips_conflict_gate_only() {
        let store = MemoryStore::default();
        let location = controlled_location(&store).await;

        store
            .put_appointment_checked(appointment_at(location.id, "09:00", "09:15"))
            .await
            .unwrap();
        // caller confirmed the double-booking
        store
            .put_appointment_forced(appointment_at(location.id, "09:10", "09:30"))
            .await
            .unwrap();
        assert_eq!(store.list_appointments().await.len(), 2);

        // placement validation still applies
        let mut open_ended = appointment_at(location.id, "09:00", "10:00");
        open_ended.start_time = None;
        open_ended.end_time = None;
        assert_matches!(
            store.put_appointment_forced(open_ended).await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_unknown_location_is_an_error() {
        let store = MemoryStore::default();
        let missing = Uuid::new_v4();
        assert_matches!(
            store
                .put_appointment_checked(appointment_at(missing, "09:00", "09:15"))
                .await,
            Err(TeamCalError::LocationNotFound { location_id }) if location_id == missing
        );
    }

    #[tokio::test]
    async fn test_attendee_batch_is_idempotent_per_user() {
        let store = MemoryStore::default();
        let location = controlled_location(&store).await;
        let appointment = appointment_at(location.id, "09:00", "09:15");
        let appointment_id = appointment.id;
        store.put_appointment_checked(appointment).await.unwrap();

        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let inserted = store
            .insert_attendees(appointment_id, &[u1, u1, u2], AttendeeStatus::Pending)
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);

        // repeating the same batch inserts nothing new
        let repeated = store
            .insert_attendees(appointment_id, &[u1, u2], AttendeeStatus::Pending)
            .await
            .unwrap();
        assert!(repeated.is_empty());
        assert_eq!(store.attendees_of(appointment_id).await.len(), 2);
    }

    #[tokio::test]
    async fn test_window_query_selects_calendar_range() {
        use crate::scheduling::time::{month_window, week_window};

        let store = MemoryStore::default();
        let location = controlled_location(&store).await;

        let mut monday = appointment_at(location.id, "09:00", "09:15");
        monday.date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let mut next_month = appointment_at(location.id, "09:00", "09:15");
        next_month.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        store.put_appointment_checked(monday).await.unwrap();
        store.put_appointment_checked(next_month).await.unwrap();

        // 2024-01-10 is a Wednesday in the week starting 2024-01-08
        let pivot = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(store.appointments_in(week_window(pivot)).await.len(), 1);
        assert_eq!(store.appointments_in(month_window(pivot)).await.len(), 1);
        assert_eq!(
            store
                .appointments_in(month_window(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()))
                .await
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_write_denied_surfaces_permission_error() {
        let store = MemoryStore::default();
        store.set_write_denied(Table::Locations, true).await;
        assert_matches!(
            store
                .insert_location(CreateLocationRequest {
                    name: "Annex".to_string(),
                    color: "#fff".to_string(),
                    has_conflict_control: false,
                })
                .await,
            Err(TeamCalError::PermissionDenied(_))
        );
    }

    #[tokio::test]
    async fn test_delete_appointment_cascades_attendees() {
        let store = MemoryStore::default();
        let location = controlled_location(&store).await;
        let appointment = appointment_at(location.id, "09:00", "09:15");
        let appointment_id = appointment.id;
        store.put_appointment_checked(appointment).await.unwrap();
        store
            .insert_attendees(
                appointment_id,
                &[Uuid::new_v4(), Uuid::new_v4()],
                AttendeeStatus::Pending,
            )
            .await
            .unwrap();

        let mut feed = store.subscribe();
        store.delete_appointment(appointment_id).await.unwrap();
        assert!(store.attendees_of(appointment_id).await.is_empty());

        // one appointment delete plus one delete per attendee row
        let mut deletes = 0;
        while let Ok(event) = feed.try_recv() {
            assert_eq!(event.kind, ChangeKind::Delete);
            deletes += 1;
        }
        assert_eq!(deletes, 3);
    }
}
