//! Attendee model and invitation state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::TeamCalError;

/// Invitation status of an attendee.
///
/// `Pending` is created by an organizer invite, `Requested` by a
/// non-invited user asking to join. Both resolve to `Accepted` or
/// `Declined`; the terminal states can only be left by deleting the
/// row and inserting a fresh invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendeeStatus {
    Pending,
    Accepted,
    Declined,
    Requested,
}

impl AttendeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendeeStatus::Pending => "pending",
            AttendeeStatus::Accepted => "accepted",
            AttendeeStatus::Declined => "declined",
            AttendeeStatus::Requested => "requested",
        }
    }

    /// Display label used wherever a status is rendered. Centralized so
    /// views never carry their own copy of this table.
    pub fn label(&self) -> &'static str {
        match self {
            AttendeeStatus::Pending => "Pendente",
            AttendeeStatus::Accepted => "Confirmado",
            AttendeeStatus::Declined => "Recusado",
            AttendeeStatus::Requested => "Solicitado",
        }
    }

    /// Display color used wherever a status is rendered.
    pub fn color(&self) -> &'static str {
        match self {
            AttendeeStatus::Pending => "#f59e0b",
            AttendeeStatus::Accepted => "#22c55e",
            AttendeeStatus::Declined => "#ef4444",
            AttendeeStatus::Requested => "#3b82f6",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttendeeStatus::Accepted | AttendeeStatus::Declined)
    }

    /// Whether the state machine permits moving to `target`.
    pub fn can_transition_to(&self, target: AttendeeStatus) -> bool {
        match self {
            AttendeeStatus::Pending | AttendeeStatus::Requested => {
                matches!(target, AttendeeStatus::Accepted | AttendeeStatus::Declined)
            }
            AttendeeStatus::Accepted | AttendeeStatus::Declined => false,
        }
    }

    /// Validate a transition, producing the error surfaced to callers.
    pub fn transition_to(&self, target: AttendeeStatus) -> Result<AttendeeStatus, TeamCalError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TeamCalError::InvalidStateTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for AttendeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invitation row. At most one per (appointment_id, user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub status: AttendeeStatus,
    pub invited_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_pending_resolves_to_accepted_or_declined() {
        assert!(AttendeeStatus::Pending.can_transition_to(AttendeeStatus::Accepted));
        assert!(AttendeeStatus::Pending.can_transition_to(AttendeeStatus::Declined));
        assert!(!AttendeeStatus::Pending.can_transition_to(AttendeeStatus::Requested));
        assert!(!AttendeeStatus::Pending.can_transition_to(AttendeeStatus::Pending));
    }

    #[test]
    fn test_requested_resolves_through_organizer_response() {
        assert!(AttendeeStatus::Requested.can_transition_to(AttendeeStatus::Accepted));
        assert!(AttendeeStatus::Requested.can_transition_to(AttendeeStatus::Declined));
        assert!(!AttendeeStatus::Requested.can_transition_to(AttendeeStatus::Pending));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        for terminal in [AttendeeStatus::Accepted, AttendeeStatus::Declined] {
            for target in [
                AttendeeStatus::Pending,
                AttendeeStatus::Accepted,
                AttendeeStatus::Declined,
                AttendeeStatus::Requested,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_transition_error_names_both_states() {
        let err = AttendeeStatus::Declined
            .transition_to(AttendeeStatus::Accepted)
            .unwrap_err();
        assert_matches!(
            err,
            TeamCalError::InvalidStateTransition { ref from, ref to }
                if from == "declined" && to == "accepted"
        );
    }
}
