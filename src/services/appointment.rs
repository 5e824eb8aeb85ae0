//! Appointment service implementation
//!
//! This service owns the scheduling write path: validation, the atomic
//! conflict-gated insert, attendee invitation lifecycle, and the
//! organizer-only cleanup on edits.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::models::{
    Appointment, Attendee, AttendeeStatus, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::scheduling::conflict::{Conflict, ConflictResolver, ScheduleOutcome};
use crate::scheduling::time::{TimeOfDay, TimeSlot};
use crate::store::MemoryStore;
use crate::utils::errors::{Result, TeamCalError};
use crate::utils::logging::{log_appointment_action, log_invitation_transition};

/// Appointment service for scheduling operations
#[derive(Clone)]
pub struct AppointmentService {
    store: MemoryStore,
    resolver: ConflictResolver,
    settings: Settings,
}

impl AppointmentService {
    /// Create a new AppointmentService instance
    pub fn new(store: MemoryStore, settings: Settings) -> Self {
        let resolver = ConflictResolver::new(store.clone());
        Self {
            store,
            resolver,
            settings,
        }
    }

    /// Read-only pre-flight conflict check for views. A UX hint only;
    /// the store re-runs the test when the write commits.
    pub async fn check_conflict(
        &self,
        location_id: Uuid,
        date: chrono::NaiveDate,
        start: Option<TimeOfDay>,
        end: Option<TimeOfDay>,
        exclude: Option<Uuid>,
    ) -> Result<Option<Conflict>> {
        self.resolver
            .check_conflict(location_id, date, start, end, exclude)
            .await
    }

    /// Create an appointment and its pending invitations.
    ///
    /// Returns `Conflict` without writing anything when the slot is
    /// taken. When the appointment lands but the attendee batch is
    /// rejected, the orphaned appointment is deleted and the call fails
    /// with `PartialWrite`.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<ScheduleOutcome> {
        validate_create(&request)?;
        let appointment = materialize(&request);
        debug!(appointment_id = %appointment.id, title = %appointment.title, "Creating appointment");

        let appointment = match self.store.put_appointment_checked(appointment).await? {
            ScheduleOutcome::Scheduled(appointment) => appointment,
            conflict => return Ok(conflict),
        };

        self.insert_initial_attendees(&appointment, &request.attendee_user_ids)
            .await?;
        log_appointment_action(appointment.id, "created", appointment.created_by, None);
        Ok(ScheduleOutcome::Scheduled(appointment))
    }

    /// Create past a reported conflict, after the caller confirmed the
    /// double-booking. Gated by configuration.
    pub async fn create_appointment_confirmed(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment> {
        if !self.settings.scheduling.allow_conflict_override {
            return Err(TeamCalError::PermissionDenied(
                "Conflict override is disabled".to_string(),
            ));
        }
        validate_create(&request)?;
        let appointment = materialize(&request);
        let appointment = self.store.put_appointment_forced(appointment).await?;
        self.insert_initial_attendees(&appointment, &request.attendee_user_ids)
            .await?;
        log_appointment_action(
            appointment.id,
            "created_over_conflict",
            appointment.created_by,
            None,
        );
        Ok(appointment)
    }

    async fn insert_initial_attendees(
        &self,
        appointment: &Appointment,
        user_ids: &[Uuid],
    ) -> Result<()> {
        let unique = dedupe(user_ids);
        if unique.is_empty() {
            return Ok(());
        }
        if let Err(e) = self
            .store
            .insert_attendees(appointment.id, &unique, AttendeeStatus::Pending)
            .await
        {
            // compensate: no half-created appointment stays behind
            warn!(appointment_id = %appointment.id, error = %e, "Attendee batch failed, rolling back appointment");
            if let Err(cleanup) = self.store.delete_appointment(appointment.id).await {
                warn!(appointment_id = %appointment.id, error = %cleanup, "Rollback of orphaned appointment failed");
            }
            return Err(TeamCalError::PartialWrite {
                appointment_id: appointment.id,
                reason: e.to_string(),
            });
        }
        Ok(())
    }

    /// Edit an appointment, re-running the conflict gate against the
    /// other bookings. Switching to organizer-only removes every
    /// attendee row as part of the edit.
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<ScheduleOutcome> {
        let updated = self.apply_patch(appointment_id, request).await?;
        let outcome = self.store.put_appointment_checked(updated).await?;
        if let ScheduleOutcome::Scheduled(ref appointment) = outcome {
            self.cleanup_if_organizer_only(appointment).await?;
            log_appointment_action(appointment.id, "updated", appointment.created_by, None);
        }
        Ok(outcome)
    }

    /// Edit past a reported conflict, after caller confirmation.
    pub async fn update_appointment_confirmed(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment> {
        if !self.settings.scheduling.allow_conflict_override {
            return Err(TeamCalError::PermissionDenied(
                "Conflict override is disabled".to_string(),
            ));
        }
        let updated = self.apply_patch(appointment_id, request).await?;
        let appointment = self.store.put_appointment_forced(updated).await?;
        self.cleanup_if_organizer_only(&appointment).await?;
        log_appointment_action(
            appointment.id,
            "updated_over_conflict",
            appointment.created_by,
            None,
        );
        Ok(appointment)
    }

    async fn apply_patch(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment> {
        let mut appointment = self
            .store
            .get_appointment(appointment_id)
            .await
            .ok_or(TeamCalError::AppointmentNotFound { appointment_id })?;

        if let Some(title) = request.title {
            appointment.title = title;
        }
        if let Some(date) = request.date {
            appointment.date = date;
        }
        if let Some(start_time) = request.start_time {
            appointment.start_time = start_time;
        }
        if let Some(end_time) = request.end_time {
            appointment.end_time = end_time;
        }
        if let Some(type_value) = request.type_value {
            appointment.type_value = type_value;
        }
        if let Some(description) = request.description {
            appointment.description = description;
        }
        if let Some(place) = request.place {
            appointment.place = place;
        }
        if let Some(organizer_only) = request.organizer_only {
            appointment.organizer_only = organizer_only;
        }
        appointment.updated_at = Utc::now();

        validate_fields(&appointment.title, appointment.start_time, appointment.end_time)?;
        Ok(appointment)
    }

    async fn cleanup_if_organizer_only(&self, appointment: &Appointment) -> Result<()> {
        if !appointment.organizer_only {
            return Ok(());
        }
        let removed = self.store.delete_attendees_for(appointment.id).await?;
        if removed > 0 {
            info!(
                appointment_id = %appointment.id,
                removed = removed,
                "Attendees removed after organizer-only edit"
            );
        }
        Ok(())
    }

    /// Delete an appointment; attendee rows cascade.
    pub async fn delete_appointment(&self, appointment_id: Uuid, actor: Uuid) -> Result<()> {
        self.store.delete_appointment(appointment_id).await?;
        log_appointment_action(appointment_id, "deleted", actor, None);
        Ok(())
    }

    /// Invite a user after creation. A declined invitation is replaced
    /// by a fresh pending row; any other existing row is left alone.
    pub async fn invite_user(&self, appointment_id: Uuid, user_id: Uuid) -> Result<Attendee> {
        let existing = self
            .store
            .attendees_of(appointment_id)
            .await
            .into_iter()
            .find(|a| a.user_id == user_id);

        if let Some(row) = existing {
            if row.status != AttendeeStatus::Declined {
                return Err(TeamCalError::Validation(format!(
                    "User {} is already invited ({})",
                    user_id, row.status
                )));
            }
            // terminal rows are never resurrected; re-invite is a
            // delete plus a fresh insert
            self.store.remove_attendee(appointment_id, user_id).await?;
        }

        let inserted = self
            .store
            .insert_attendees(appointment_id, &[user_id], AttendeeStatus::Pending)
            .await?;
        inserted
            .into_iter()
            .next()
            .ok_or(TeamCalError::AttendeeNotFound {
                appointment_id,
                user_id,
            })
    }

    /// A non-invited user asks to join; the row starts in `requested`
    /// and waits for an organizer response.
    pub async fn request_to_join(&self, appointment_id: Uuid, user_id: Uuid) -> Result<Attendee> {
        if !self.settings.scheduling.allow_join_requests {
            return Err(TeamCalError::PermissionDenied(
                "Join requests are disabled".to_string(),
            ));
        }
        let already = self
            .store
            .attendees_of(appointment_id)
            .await
            .iter()
            .any(|a| a.user_id == user_id);
        if already {
            return Err(TeamCalError::Validation(format!(
                "User {} already has an invitation row",
                user_id
            )));
        }
        let inserted = self
            .store
            .insert_attendees(appointment_id, &[user_id], AttendeeStatus::Requested)
            .await?;
        inserted
            .into_iter()
            .next()
            .ok_or(TeamCalError::AttendeeNotFound {
                appointment_id,
                user_id,
            })
    }

    /// Resolve an invitation to accepted or declined. Used by both the
    /// invitee and the organizer responding to a join request.
    pub async fn respond_invitation(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        status: AttendeeStatus,
    ) -> Result<Attendee> {
        if !status.is_terminal() {
            return Err(TeamCalError::Validation(format!(
                "Invitation response must be accepted or declined, got {}",
                status
            )));
        }
        let previous = self
            .store
            .attendees_of(appointment_id)
            .await
            .into_iter()
            .find(|a| a.user_id == user_id)
            .map(|a| a.status);
        let updated = self
            .store
            .update_attendee_status(appointment_id, user_id, status)
            .await?;
        if let Some(previous) = previous {
            log_invitation_transition(appointment_id, user_id, previous.as_str(), status.as_str());
        }
        Ok(updated)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Option<Appointment> {
        self.store.get_appointment(appointment_id).await
    }

    pub async fn attendees_of(&self, appointment_id: Uuid) -> Vec<Attendee> {
        self.store.attendees_of(appointment_id).await
    }
}

fn materialize(request: &CreateAppointmentRequest) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Uuid::new_v4(),
        title: request.title.clone(),
        date: request.date,
        start_time: request.start_time,
        end_time: request.end_time,
        type_value: request.type_value.clone(),
        description: request.description.clone(),
        created_by: request.created_by,
        place: request.place.clone(),
        organizer_only: request.organizer_only,
        created_at: now,
        updated_at: now,
    }
}

fn validate_create(request: &CreateAppointmentRequest) -> Result<()> {
    validate_fields(&request.title, request.start_time, request.end_time)?;
    if request.organizer_only && !request.attendee_user_ids.is_empty() {
        return Err(TeamCalError::Validation(
            "Organizer-only appointments cannot have attendees".to_string(),
        ));
    }
    Ok(())
}

fn validate_fields(
    title: &str,
    start_time: Option<TimeOfDay>,
    end_time: Option<TimeOfDay>,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(TeamCalError::Validation("Title is required".to_string()));
    }
    match (start_time, end_time) {
        (None, Some(_)) => Err(TeamCalError::Validation(
            "End time requires a start time".to_string(),
        )),
        (Some(start), Some(end)) => {
            // ordering holds for every timed appointment, conflict
            // controlled or not
            TimeSlot::new(start, end).map(|_| ())
        }
        _ => Ok(()),
    }
}

fn dedupe(user_ids: &[Uuid]) -> Vec<Uuid> {
    let mut unique = Vec::with_capacity(user_ids.len());
    for &user_id in user_ids {
        if !unique.contains(&user_id) {
            unique.push(user_id);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentPlace, CreateLocationRequest};
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn service() -> AppointmentService {
        AppointmentService::new(MemoryStore::default(), Settings::default())
    }

    fn request(place: AppointmentPlace) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            title: "Standup".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            start_time: Some("09:00".parse().unwrap()),
            end_time: Some("09:15".parse().unwrap()),
            type_value: "meeting".to_string(),
            description: None,
            created_by: Uuid::new_v4(),
            place,
            organizer_only: false,
            attendee_user_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_empty_title_rejected_before_any_write() {
        let service = service();
        let mut req = request(AppointmentPlace::None);
        req.title = "  ".to_string();
        assert_matches!(
            service.create_appointment(req).await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_end_without_start_rejected() {
        let service = service();
        let mut req = request(AppointmentPlace::None);
        req.start_time = None;
        assert_matches!(
            service.create_appointment(req).await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_organizer_only_with_invitees_rejected() {
        let service = service();
        let mut req = request(AppointmentPlace::None);
        req.organizer_only = true;
        req.attendee_user_ids = vec![Uuid::new_v4()];
        assert_matches!(
            service.create_appointment(req).await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_duplicate_invitees_collapse_to_one_row() {
        let service = service();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let mut req = request(AppointmentPlace::None);
        req.attendee_user_ids = vec![u1, u1, u2];

        let outcome = service.create_appointment(req).await.unwrap();
        let ScheduleOutcome::Scheduled(appointment) = outcome else {
            panic!("expected scheduled outcome");
        };
        let rows = service.attendees_of(appointment.id).await;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|a| a.status == AttendeeStatus::Pending));
        assert_eq!(rows[0].user_id, u1);
        assert_eq!(rows[1].user_id, u2);
    }

    #[tokio::test]
    async fn test_declined_reinvite_goes_through_fresh_row() {
        let service = service();
        let user = Uuid::new_v4();
        let mut req = request(AppointmentPlace::None);
        req.attendee_user_ids = vec![user];
        let ScheduleOutcome::Scheduled(appointment) =
            service.create_appointment(req).await.unwrap()
        else {
            panic!("expected scheduled outcome");
        };

        service
            .respond_invitation(appointment.id, user, AttendeeStatus::Declined)
            .await
            .unwrap();
        // re-invite replaces the declined row with a fresh pending one
        let fresh = service.invite_user(appointment.id, user).await.unwrap();
        assert_eq!(fresh.status, AttendeeStatus::Pending);
        assert_eq!(service.attendees_of(appointment.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_respond_requires_terminal_status() {
        let service = service();
        let user = Uuid::new_v4();
        let mut req = request(AppointmentPlace::None);
        req.attendee_user_ids = vec![user];
        let ScheduleOutcome::Scheduled(appointment) =
            service.create_appointment(req).await.unwrap()
        else {
            panic!("expected scheduled outcome");
        };

        assert_matches!(
            service
                .respond_invitation(appointment.id, user, AttendeeStatus::Requested)
                .await,
            Err(TeamCalError::Validation(_))
        );
    }

    #[tokio::test]
    async fn test_conflict_override_respects_settings() {
        let store = MemoryStore::default();
        let location = store
            .insert_location(CreateLocationRequest {
                name: "War room".to_string(),
                color: "#0ea5e9".to_string(),
                has_conflict_control: true,
            })
            .await
            .unwrap();

        let mut settings = Settings::default();
        settings.scheduling.allow_conflict_override = false;
        let service = AppointmentService::new(store, settings);

        service
            .create_appointment(request(AppointmentPlace::Managed(location.id)))
            .await
            .unwrap();
        assert_matches!(
            service
                .create_appointment_confirmed(request(AppointmentPlace::Managed(location.id)))
                .await,
            Err(TeamCalError::PermissionDenied(_))
        );
    }
}
