//! Profile and sector models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team sector (department). Membership drives sector filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: Uuid,
    pub name: String,
}

/// A user profile as seen by the scheduling engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: String,
    pub sector_ids: Vec<Uuid>,
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn belongs_to_any(&self, sector_ids: &[Uuid]) -> bool {
        self.sector_ids.iter().any(|s| sector_ids.contains(s))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub sector_ids: Option<Vec<Uuid>>,
    pub avatar_url: Option<Option<String>>,
}
