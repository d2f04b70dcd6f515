//! Platform resource types and their v2 wire representations

use serde::{Deserialize, Serialize};

/// Top-level tenant grouping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub guid: String,
    pub name: String,
}

/// Sub-grouping of applications within an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub guid: String,
    pub name: String,
    pub organization_guid: String,
}

/// `GET /v2/spaces/:guid/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceSummary {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub apps: Vec<AppSummary>,
}

/// One application as embedded in a space summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSummary {
    pub guid: String,
    pub name: String,
    /// Desired instance count
    #[serde(default)]
    pub instances: u32,
    /// Null while the app is stopped or staging
    #[serde(default)]
    pub running_instances: Option<u32>,
    /// Memory per instance in MB
    #[serde(default)]
    pub memory: u64,
    /// Disk quota per instance in MB
    #[serde(default)]
    pub disk_quota: u64,
    #[serde(default)]
    pub stack_guid: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub buildpack: Option<String>,
    #[serde(default)]
    pub detected_buildpack: Option<String>,
}

/// A page of a v2 list endpoint
#[derive(Debug, Deserialize)]
pub(super) struct Page<T> {
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<T>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Resource<T> {
    pub metadata: Metadata,
    pub entity: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct Metadata {
    pub guid: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrganizationEntity {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpaceEntity {
    pub name: String,
    pub organization_guid: String,
}

impl From<Resource<OrganizationEntity>> for Organization {
    fn from(resource: Resource<OrganizationEntity>) -> Self {
        Self {
            guid: resource.metadata.guid,
            name: resource.entity.name,
        }
    }
}

impl From<Resource<SpaceEntity>> for Space {
    fn from(resource: Resource<SpaceEntity>) -> Self {
        Self {
            guid: resource.metadata.guid,
            name: resource.entity.name,
            organization_guid: resource.entity.organization_guid,
        }
    }
}

/// `GET /v2/info`, trimmed to the field the client needs
#[derive(Debug, Deserialize)]
pub(super) struct Info {
    pub token_endpoint: String,
}

/// UAA `/oauth/token` response
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
