//! Flattened per-application record stored in snapshots

use crate::cf::{AppSummary, Organization, Space};
use serde::Serialize;

/// Identifier and name of an owning space or organization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

/// One application with its owning space and organization denormalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationRecord {
    pub id: String,
    pub name: String,
    /// Desired instances
    pub instances: u32,
    pub running_instances: u32,
    pub memory_mb: u64,
    pub disk_quota_mb: u64,
    pub stack_id: String,
    pub state: String,
    /// Effective buildpack, see [`resolve_buildpacks`]
    pub buildpack: String,
    pub detected_buildpack: String,
    pub space: EntityRef,
    pub organization: EntityRef,
}

impl ApplicationRecord {
    pub fn new(app: &AppSummary, space: &Space, organization: &Organization) -> Self {
        let (buildpack, detected_buildpack) =
            resolve_buildpacks(app.buildpack.as_deref(), app.detected_buildpack.as_deref());

        Self {
            id: app.guid.clone(),
            name: app.name.clone(),
            instances: app.instances,
            running_instances: app.running_instances.unwrap_or(0),
            memory_mb: app.memory,
            disk_quota_mb: app.disk_quota,
            stack_id: app.stack_guid.clone(),
            state: app.state.clone(),
            buildpack,
            detected_buildpack,
            space: EntityRef {
                id: space.guid.clone(),
                name: space.name.clone(),
            },
            organization: EntityRef {
                id: organization.guid.clone(),
                name: organization.name.clone(),
            },
        }
    }
}

/// Resolve `(buildpack, detected_buildpack)`, each falling back to the other when unset.
///
/// Null and empty are both treated as unset.
pub fn resolve_buildpacks(buildpack: Option<&str>, detected: Option<&str>) -> (String, String) {
    let buildpack = buildpack.filter(|b| !b.is_empty());
    let detected = detected.filter(|d| !d.is_empty());

    (
        buildpack.or(detected).unwrap_or_default().to_string(),
        detected.or(buildpack).unwrap_or_default().to_string(),
    )
}
