//! Services module
//!
//! This module contains business logic services

pub mod appointment;
pub mod sync;

// Re-export commonly used services
pub use appointment::AppointmentService;
pub use sync::{SyncService, Snapshot};

use crate::config::settings::Settings;
use crate::store::MemoryStore;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub appointment_service: AppointmentService,
    pub sync_service: SyncService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(store: MemoryStore, settings: Settings) -> Result<Self> {
        settings.validate()?;
        let appointment_service = AppointmentService::new(store.clone(), settings);
        let sync_service = SyncService::new(store);

        Ok(Self {
            appointment_service,
            sync_service,
        })
    }

    /// Health check for all services
    pub fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            appointment_service_ready: true,
            sync_snapshot_fresh: self.sync_service.snapshot().refreshed_at.is_some(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub appointment_service_ready: bool,
    pub sync_snapshot_fresh: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.appointment_service_ready
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.appointment_service_ready {
            issues.push("Appointment service not ready".to_string());
        }
        if !self.sync_snapshot_fresh {
            issues.push("Snapshot never refreshed".to_string());
        }
        issues
    }
}
