//! Store module
//!
//! This module wraps the external transactional store: tables, row-level
//! write grants, and the change feed the synchronizer consumes.

pub mod change;
pub mod memory;

pub use change::{ChangeEvent, ChangeKind, EventFilter, Table};
pub use memory::MemoryStore;

use crate::config::settings::Settings;

/// Store service holding the shared store handle.
#[derive(Clone)]
pub struct StoreService {
    store: MemoryStore,
}

impl StoreService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            store: MemoryStore::new(settings.store.channel_capacity),
        }
    }

    pub fn store(&self) -> MemoryStore {
        self.store.clone()
    }

    /// Health check: the store is healthy when its change feed can still
    /// accept subscribers.
    pub fn health_check(&self) -> bool {
        let receiver = self.store.subscribe();
        drop(receiver);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_service_hands_out_shared_handle() {
        let service = StoreService::new(&Settings::default());
        assert!(service.health_check());

        let a = service.store();
        let b = service.store();
        let sector = a.insert_sector("Engineering").await.unwrap();
        // both handles see the same tables
        assert!(b.list_sectors().await.iter().any(|s| s.id == sector.id));
    }
}
