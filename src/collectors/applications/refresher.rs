//! Background refresh pipeline
//!
//! One cycle lists organizations, fans out to list each organization's spaces,
//! fans out again to fetch each space summary, and publishes everything that
//! came back as a single [`Snapshot`]. A failed branch contributes no records
//! but marks the whole cycle as failed.

use super::record::ApplicationRecord;
use super::snapshot::{Snapshot, SnapshotStore};
use crate::cf::{Organization, PlatformApi, Space};
use crate::config::ExporterConfig;
use crate::utils::error::ExporterError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Organizations processed at once
pub const DEFAULT_ORG_CONCURRENCY: usize = 10;

/// Spaces processed at once, per organization
pub const DEFAULT_SPACE_CONCURRENCY: usize = 10;

/// Records and the first error gathered by the tasks of one cycle
#[derive(Default)]
struct CycleState {
    records: Mutex<Vec<ApplicationRecord>>,
    first_error: Mutex<Option<ExporterError>>,
}

impl CycleState {
    fn extend(&self, records: Vec<ApplicationRecord>) {
        self.records.lock().extend(records);
    }

    /// Keep the first error only; later ones are logged by their branch
    fn record_error(&self, err: ExporterError) {
        let mut first = self.first_error.lock();
        if first.is_none() {
            *first = Some(err);
        }
    }

    fn take(&self) -> (Vec<ApplicationRecord>, Option<ExporterError>) {
        (
            std::mem::take(&mut *self.records.lock()),
            self.first_error.lock().take(),
        )
    }
}

/// Periodically rebuilds the application inventory snapshot
pub struct Refresher {
    api: Arc<dyn PlatformApi>,
    store: SnapshotStore,
    interval: Duration,
    org_concurrency: usize,
    space_concurrency: usize,
}

impl Refresher {
    pub fn new(api: Arc<dyn PlatformApi>, store: SnapshotStore, interval: Duration) -> Self {
        Self {
            api,
            store,
            interval,
            org_concurrency: DEFAULT_ORG_CONCURRENCY,
            space_concurrency: DEFAULT_SPACE_CONCURRENCY,
        }
    }

    pub fn from_config(
        api: Arc<dyn PlatformApi>,
        store: SnapshotStore,
        config: &ExporterConfig,
    ) -> Self {
        Self::new(api, store, config.refresh_interval())
            .with_concurrency(config.org_concurrency, config.space_concurrency)
    }

    /// Override the fan-out widths; zero is raised to one
    pub fn with_concurrency(mut self, organizations: usize, spaces: usize) -> Self {
        self.org_concurrency = organizations.max(1);
        self.space_concurrency = spaces.max(1);
        self
    }

    /// Run a cycle now and then on every tick, forever.
    ///
    /// Ticks missed while a slow cycle runs are delayed rather than bursted,
    /// so cycles never overlap.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                interval_secs = self.interval.as_secs(),
                "Starting application inventory refresher"
            );

            loop {
                interval.tick().await;
                self.refresh_once().await;
            }
        })
    }

    /// Run one full cycle and publish its snapshot
    pub async fn refresh_once(&self) -> Arc<Snapshot> {
        let started = Instant::now();
        info!("Refreshing application inventory");

        let (records, err) = self.run_cycle().await;
        let elapsed = started.elapsed();

        match &err {
            None => info!(
                applications = records.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Application inventory refreshed"
            ),
            Some(e) => warn!(
                applications = records.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Application inventory refresh finished with errors"
            ),
        }

        self.store.publish(Snapshot::new(records, err, elapsed))
    }

    async fn run_cycle(&self) -> (Vec<ApplicationRecord>, Option<ExporterError>) {
        let organizations = match self.api.list_organizations().await {
            Ok(organizations) => organizations,
            Err(e) => {
                error!(upstream = e.is_upstream(), "Error while listing organizations: {}", e);
                return (Vec::new(), Some(e));
            }
        };
        debug!("Found {} organizations", organizations.len());

        let cycle = Arc::new(CycleState::default());
        let permits = Arc::new(Semaphore::new(self.org_concurrency));
        let mut tasks = JoinSet::new();

        for organization in organizations {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                cycle.record_error(ExporterError::internal("organization semaphore closed"));
                break;
            };

            let api = Arc::clone(&self.api);
            let cycle = Arc::clone(&cycle);
            let width = self.space_concurrency;
            tasks.spawn(async move {
                let _permit = permit;
                collect_organization(api, organization, width, cycle).await;
            });
        }

        join_all(&mut tasks, &cycle, "organization").await;
        cycle.take()
    }
}

/// List one organization's spaces and fan out over them
async fn collect_organization(
    api: Arc<dyn PlatformApi>,
    organization: Organization,
    width: usize,
    cycle: Arc<CycleState>,
) {
    let spaces = match api.list_spaces(&organization).await {
        Ok(spaces) => spaces,
        Err(e) => {
            error!(
                organization_id = %organization.guid,
                "Error while listing spaces for organization: {}", e
            );
            cycle.record_error(e);
            return;
        }
    };
    debug!(
        organization_id = %organization.guid,
        "Found {} spaces", spaces.len()
    );

    let organization = Arc::new(organization);
    let permits = Arc::new(Semaphore::new(width));
    let mut tasks = JoinSet::new();

    for space in spaces {
        let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
            cycle.record_error(ExporterError::internal("space semaphore closed"));
            break;
        };

        let api = Arc::clone(&api);
        let organization = Arc::clone(&organization);
        let cycle = Arc::clone(&cycle);
        tasks.spawn(async move {
            let _permit = permit;
            collect_space(api.as_ref(), &organization, space, &cycle).await;
        });
    }

    join_all(&mut tasks, &cycle, "space").await;
}

/// Fetch one space summary and add its applications to the cycle
async fn collect_space(
    api: &dyn PlatformApi,
    organization: &Organization,
    space: Space,
    cycle: &CycleState,
) {
    let summary = match api.space_summary(&space).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(
                space_id = %space.guid,
                organization_id = %organization.guid,
                "Error while getting summary for space: {}", e
            );
            cycle.record_error(e);
            return;
        }
    };

    let records: Vec<ApplicationRecord> = summary
        .apps
        .iter()
        .map(|app| ApplicationRecord::new(app, &space, organization))
        .collect();

    debug!(
        space_id = %space.guid,
        "Collected {} applications", records.len()
    );
    cycle.extend(records);
}

/// Wait for every task of one fan-out level; a panicked task counts as a failed branch
async fn join_all(tasks: &mut JoinSet<()>, cycle: &CycleState, level: &str) {
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("{} task failed: {}", level, e);
            cycle.record_error(ExporterError::internal(format!(
                "{} task failed: {}",
                level, e
            )));
        }
    }
}
