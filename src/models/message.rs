//! Message model
//!
//! The engine only cares about messages for unread counters; content and
//! delivery belong to the messaging views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}
