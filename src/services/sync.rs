//! Change-notification synchronizer
//!
//! Consumes the store's change feed and keeps one shared snapshot all
//! open views render from. Every event invalidates and fully recomputes
//! the snapshot; nothing is delta-patched and no counter is ever
//! incremented locally, so at-least-once unordered delivery stays
//! harmless. A lagging subscription is recovered by the same full
//! reload.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{AttendeeStatus, Profile};
use crate::scheduling::aggregate::{build_views, AppointmentView};
use crate::scheduling::filter::ScheduleFilter;
use crate::store::{ChangeEvent, EventFilter, MemoryStore};
use crate::utils::errors::{Result, TeamCalError};
use crate::utils::logging::log_snapshot_refresh;

/// The consistent state every open view reads from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub appointments: Vec<AppointmentView>,
    pub profiles: HashMap<Uuid, Profile>,
    /// Per-recipient unread message count, recomputed from rows.
    pub unread_messages: HashMap<Uuid, usize>,
    /// Per-user count of invitations awaiting a response.
    pub pending_invitations: HashMap<Uuid, usize>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Filtered projection for one view. Views never query the store
    /// directly; they all project from the same snapshot.
    pub fn project(&self, filter: &ScheduleFilter) -> Vec<AppointmentView> {
        crate::scheduling::filter::apply(&self.appointments, filter, &self.profiles)
    }
}

/// Synchronizer service driving snapshot recomputation.
#[derive(Clone)]
pub struct SyncService {
    store: MemoryStore,
    snapshot_tx: Arc<watch::Sender<Snapshot>>,
    filter: EventFilter,
}

impl SyncService {
    /// Create a new SyncService instance reacting to every table.
    pub fn new(store: MemoryStore) -> Self {
        Self::with_filter(store, EventFilter::default())
    }

    /// Create a SyncService scoped to a column predicate, e.g. only
    /// attendee rows for one user.
    pub fn with_filter(store: MemoryStore, filter: EventFilter) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            store,
            snapshot_tx: Arc::new(snapshot_tx),
            filter,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Recompute the snapshot from the store and publish it.
    /// Last-write-wins: a recomputation superseded by a later one is
    /// simply shadowed.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let started = std::time::Instant::now();

        let appointments = self.store.list_appointments().await;
        let attendees = self.store.list_attendees().await;
        let locations = self.store.list_locations().await;
        let types = self.store.list_appointment_types().await;
        let profiles = self.store.list_profiles().await;
        let messages = self.store.list_messages().await;

        let views = build_views(&appointments, &attendees, &locations, &types, &profiles);

        let mut unread_messages: HashMap<Uuid, usize> = HashMap::new();
        for message in messages.iter().filter(|m| !m.read) {
            *unread_messages.entry(message.recipient_id).or_default() += 1;
        }

        let mut pending_invitations: HashMap<Uuid, usize> = HashMap::new();
        for attendee in attendees.iter().filter(|a| {
            matches!(a.status, AttendeeStatus::Pending | AttendeeStatus::Requested)
        }) {
            *pending_invitations.entry(attendee.user_id).or_default() += 1;
        }

        let snapshot = Snapshot {
            appointments: views,
            profiles: profiles.into_iter().map(|p| (p.user_id, p)).collect(),
            unread_messages,
            pending_invitations,
            refreshed_at: Some(Utc::now()),
        };

        log_snapshot_refresh(
            "all",
            snapshot.appointments.len(),
            started.elapsed().as_millis() as u64,
        );
        self.snapshot_tx.send_replace(snapshot.clone());
        Ok(snapshot)
    }

    /// Consume the change feed until the store goes away.
    ///
    /// Every relevant event triggers a full recompute. Lagged receivers
    /// recover with the same full reload, so dropped events are never
    /// fatal.
    pub async fn run(&self) -> Result<()> {
        let mut feed = self.store.subscribe();
        self.refresh().await?;

        loop {
            match feed.recv().await {
                Ok(event) if self.filter.matches(&event) => {
                    self.handle_event(event).await?;
                }
                Ok(event) => {
                    debug!(table = event.table.as_str(), "Event outside subscription scope");
                }
                Err(err) => match TeamCalError::from(err) {
                    err @ TeamCalError::SyncLagged { .. } => {
                        warn!(error = %err, "Change feed lagged, full reload");
                        self.refresh().await?;
                    }
                    err => {
                        info!(error = %err, "Change feed closed, synchronizer stopping");
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Handle one change event. Idempotent: replaying an event yields
    /// the same snapshot because state is recomputed, not patched.
    pub async fn handle_event(&self, event: ChangeEvent) -> Result<Snapshot> {
        debug!(
            table = event.table.as_str(),
            kind = ?event.kind,
            row_id = %event.row_id,
            "Change event received"
        );
        self.refresh().await
    }
}
