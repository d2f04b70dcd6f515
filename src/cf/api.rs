//! The three read-only platform operations the refresh pipeline consumes

use super::types::{Organization, Space, SpaceSummary};
use crate::utils::error::Result;

/// Read-only view of the platform's organization → space → application tree
#[async_trait::async_trait]
pub trait PlatformApi: Send + Sync + 'static {
    /// List every organization visible to the configured credentials
    async fn list_organizations(&self) -> Result<Vec<Organization>>;

    /// List the spaces of one organization
    async fn list_spaces(&self, organization: &Organization) -> Result<Vec<Space>>;

    /// Fetch a space summary, which embeds the space's applications
    async fn space_summary(&self, space: &Space) -> Result<SpaceSummary>;
}
