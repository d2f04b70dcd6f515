//! Immutable refresh results and the handle they are published through

use super::record::ApplicationRecord;
use crate::utils::error::ExporterError;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one refresh cycle. Never mutated after publication.
#[derive(Debug, Default)]
pub struct Snapshot {
    records: Vec<ApplicationRecord>,
    error: Option<Arc<ExporterError>>,
    published_at: Option<DateTime<Utc>>,
    cycle_duration: Option<Duration>,
}

impl Snapshot {
    /// Snapshot of a finished cycle, `error` being the first failure it recorded
    pub fn new(
        records: Vec<ApplicationRecord>,
        error: Option<ExporterError>,
        cycle_duration: Duration,
    ) -> Self {
        Self {
            records,
            error: error.map(Arc::new),
            published_at: Some(Utc::now()),
            cycle_duration: Some(cycle_duration),
        }
    }

    /// The empty snapshot served before the first cycle completes
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn error(&self) -> Option<&ExporterError> {
        self.error.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `None` until the first cycle has been published
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn cycle_duration(&self) -> Option<Duration> {
        self.cycle_duration
    }
}

/// Single-writer, many-reader handle to the current [`Snapshot`].
///
/// Publishing swaps the whole `Arc`, so a reader holds either the previous
/// snapshot or the next one, never a mix.
#[derive(Clone)]
pub struct SnapshotStore {
    current: Arc<ArcSwap<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(Snapshot::empty())),
        }
    }

    /// Current snapshot; stays valid even if a newer one is published meanwhile
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Replace the current snapshot wholesale
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self.current.load();
        f.debug_struct("SnapshotStore")
            .field("records", &current.len())
            .field("ok", &current.is_ok())
            .field("published_at", &current.published_at())
            .finish()
    }
}
