//! Application inventory metrics
//!
//! [`Refresher`] walks organizations → spaces → applications on a timer and
//! publishes a [`Snapshot`] into a [`SnapshotStore`]. [`ApplicationsCollector`]
//! reads whatever snapshot is current when Prometheus scrapes.

mod exporter;
mod record;
mod refresher;
mod snapshot;


pub use exporter::ApplicationsCollector;
pub use record::{ApplicationRecord, EntityRef, resolve_buildpacks};
pub use refresher::{DEFAULT_ORG_CONCURRENCY, DEFAULT_SPACE_CONCURRENCY, Refresher};
pub use snapshot::{Snapshot, SnapshotStore};
