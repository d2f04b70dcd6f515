//! Prometheus collector serving the current application snapshot

use super::record::ApplicationRecord;
use super::snapshot::{Snapshot, SnapshotStore};
use crate::config::ExporterConfig;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Counter, Gauge, GaugeVec, Opts};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

const INFO_LABELS: &[&str] = &[
    "application_id",
    "application_name",
    "detected_buildpack",
    "buildpack",
    "organization_id",
    "organization_name",
    "space_id",
    "space_name",
    "stack_id",
    "state",
];

const INSTANCE_LABELS: &[&str] = &[
    "application_id",
    "application_name",
    "organization_id",
    "organization_name",
    "space_id",
    "space_name",
    "state",
];

const RESOURCE_LABELS: &[&str] = &[
    "application_id",
    "application_name",
    "organization_id",
    "organization_name",
    "space_id",
    "space_name",
];

/// Maps the current [`Snapshot`] to application metrics on every scrape.
///
/// Collecting never touches the network. Record-level series are rebuilt
/// from scratch each time, so applications missing from the snapshot are
/// no longer exported.
#[derive(Clone)]
pub struct ApplicationsCollector {
    store: SnapshotStore,
    info: GaugeVec,
    instances: GaugeVec,
    instances_running: GaugeVec,
    memory_mb: GaugeVec,
    disk_quota_mb: GaugeVec,
    scrapes_total: Counter,
    scrape_errors_total: Counter,
    last_scrape_error: Gauge,
    last_scrape_timestamp: Gauge,
    last_scrape_duration_seconds: Gauge,
    // Serializes reset + populate + gather across concurrent scrapes.
    collect_lock: Arc<Mutex<()>>,
    // Publication time of the last failed snapshot already logged.
    reported_failure: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl ApplicationsCollector {
    pub fn new(
        namespace: &str,
        environment: &str,
        deployment: &str,
        store: SnapshotStore,
    ) -> Result<Self> {
        let opts = |subsystem: &str, name: &str, help: &str| {
            Opts::new(name, help)
                .namespace(namespace)
                .subsystem(subsystem)
                .const_label("environment", environment)
                .const_label("deployment", deployment)
        };

        Ok(Self {
            store,
            info: GaugeVec::new(
                opts(
                    "application",
                    "info",
                    "Labeled Cloud Foundry Application information with a constant '1' value.",
                ),
                INFO_LABELS,
            )?,
            instances: GaugeVec::new(
                opts(
                    "application",
                    "instances",
                    "Number of desired Cloud Foundry Application Instances.",
                ),
                INSTANCE_LABELS,
            )?,
            instances_running: GaugeVec::new(
                opts(
                    "application",
                    "instances_running",
                    "Number of running Cloud Foundry Application Instances.",
                ),
                INSTANCE_LABELS,
            )?,
            memory_mb: GaugeVec::new(
                opts(
                    "application",
                    "memory_mb",
                    "Cloud Foundry Application Memory (Mb).",
                ),
                RESOURCE_LABELS,
            )?,
            disk_quota_mb: GaugeVec::new(
                opts(
                    "application",
                    "disk_quota_mb",
                    "Cloud Foundry Application Disk Quota (Mb).",
                ),
                RESOURCE_LABELS,
            )?,
            scrapes_total: Counter::with_opts(opts(
                "applications_scrapes",
                "total",
                "Total number of scrapes for Cloud Foundry Applications.",
            ))?,
            scrape_errors_total: Counter::with_opts(opts(
                "applications_scrape_errors",
                "total",
                "Total number of scrape errors of Cloud Foundry Applications.",
            ))?,
            last_scrape_error: Gauge::with_opts(opts(
                "",
                "last_applications_scrape_error",
                "Whether the last scrape of Applications metrics from Cloud Foundry resulted in an error (1 for error, 0 for success).",
            ))?,
            last_scrape_timestamp: Gauge::with_opts(opts(
                "",
                "last_applications_scrape_timestamp",
                "Number of seconds since 1970 since last scrape of Applications metrics from Cloud Foundry.",
            ))?,
            last_scrape_duration_seconds: Gauge::with_opts(opts(
                "",
                "last_applications_scrape_duration_seconds",
                "Duration of the last scrape of Applications metrics from Cloud Foundry.",
            ))?,
            collect_lock: Arc::new(Mutex::new(())),
            reported_failure: Arc::new(Mutex::new(None)),
        })
    }

    pub fn from_config(config: &ExporterConfig, store: SnapshotStore) -> Result<Self> {
        Self::new(
            &config.namespace,
            &config.environment,
            &config.deployment,
            store,
        )
    }

    fn record_vecs(&self) -> [&GaugeVec; 5] {
        [
            &self.info,
            &self.instances,
            &self.instances_running,
            &self.memory_mb,
            &self.disk_quota_mb,
        ]
    }

    /// True the first time a given failed snapshot is served
    pub(super) fn first_failed_scrape(&self, snapshot: &Snapshot) -> bool {
        let mut reported = self.reported_failure.lock();
        if *reported == snapshot.published_at() {
            return false;
        }
        *reported = snapshot.published_at();
        true
    }

    fn load_from_snapshot(&self, snapshot: &Snapshot) {
        for vec in self.record_vecs() {
            vec.reset();
        }

        for record in snapshot.records() {
            self.observe(record);
        }
    }

    fn observe(&self, app: &ApplicationRecord) {
        let org = &app.organization;
        let space = &app.space;

        let info_labels: [&str; 10] = [
            &app.id,
            &app.name,
            &app.detected_buildpack,
            &app.buildpack,
            &org.id,
            &org.name,
            &space.id,
            &space.name,
            &app.stack_id,
            &app.state,
        ];
        self.info.with_label_values(&info_labels).set(1.0);

        let instance_labels: [&str; 7] = [
            &app.id,
            &app.name,
            &org.id,
            &org.name,
            &space.id,
            &space.name,
            &app.state,
        ];
        self.instances
            .with_label_values(&instance_labels)
            .set(f64::from(app.instances));
        self.instances_running
            .with_label_values(&instance_labels)
            .set(f64::from(app.running_instances));

        let resource_labels: [&str; 6] = [
            &app.id,
            &app.name,
            &org.id,
            &org.name,
            &space.id,
            &space.name,
        ];
        self.memory_mb
            .with_label_values(&resource_labels)
            .set(app.memory_mb as f64);
        self.disk_quota_mb
            .with_label_values(&resource_labels)
            .set(app.disk_quota_mb as f64);
    }
}

impl Collector for ApplicationsCollector {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs = Vec::new();
        for vec in self.record_vecs() {
            descs.extend(vec.desc());
        }
        descs.extend(self.scrapes_total.desc());
        descs.extend(self.scrape_errors_total.desc());
        descs.extend(self.last_scrape_error.desc());
        descs.extend(self.last_scrape_timestamp.desc());
        descs.extend(self.last_scrape_duration_seconds.desc());
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let _guard = self.collect_lock.lock();
        let begun = Instant::now();

        let snapshot = self.store.load();
        self.load_from_snapshot(&snapshot);

        let mut families = Vec::new();
        for vec in self.record_vecs() {
            families.extend(vec.collect());
        }

        let error_value = match snapshot.error() {
            Some(e) => {
                if self.first_failed_scrape(&snapshot) {
                    warn!("Serving application snapshot with refresh error: {}", e);
                } else {
                    debug!("Snapshot still carries refresh error: {}", e);
                }
                self.scrape_errors_total.inc();
                1.0
            }
            None => 0.0,
        };
        self.scrapes_total.inc();
        self.last_scrape_error.set(error_value);
        self.last_scrape_timestamp.set(unix_seconds());
        self.last_scrape_duration_seconds
            .set(begun.elapsed().as_secs_f64());

        families.extend(self.scrape_errors_total.collect());
        families.extend(self.scrapes_total.collect());
        families.extend(self.last_scrape_error.collect());
        families.extend(self.last_scrape_timestamp.collect());
        families.extend(self.last_scrape_duration_seconds.collect());

        debug!(
            applications = snapshot.len(),
            "Collected application metrics"
        );
        families
    }
}

fn unix_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}
