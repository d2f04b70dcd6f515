//! `reqwest` implementation of [`PlatformApi`]

use super::api::PlatformApi;
use super::auth::{Credentials, TokenProvider};
use super::{endpoint, follow};
use super::types::{
    Organization, OrganizationEntity, Page, Resource, Space, SpaceEntity, SpaceSummary,
};
use crate::config::CfConfig;
use crate::utils::error::{ExporterError, Result};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

const RESULTS_PER_PAGE: &str = "100";

/// Cloud Foundry Cloud Controller v2 client
#[derive(Debug)]
pub struct CloudFoundryClient {
    http: reqwest::Client,
    api_url: Url,
    auth: TokenProvider,
}

impl CloudFoundryClient {
    /// Create a client from configuration; no request is made until first use
    pub fn new(config: &CfConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)?;
        let credentials = Credentials::from_config(config)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.skip_ssl_validation)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        let auth = TokenProvider::new(http.clone(), api_url.clone(), credentials);

        Ok(Self {
            http,
            api_url,
            auth,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// GET a JSON document, retrying once with a fresh token on 401
    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let mut response = self.send_authorized(url).await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!("Token rejected by {}, refreshing", url);
            self.auth.invalidate().await;
            response = self.send_authorized(url).await?;
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ExporterError::api(status, url.as_str(), message));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_authorized(&self, url: &Url) -> Result<reqwest::Response> {
        let token = self.auth.bearer_token().await?;
        Ok(self
            .http
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Walk every page of a v2 list endpoint
    async fn list_all<E: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<Resource<E>>> {
        let mut url = endpoint(&self.api_url, segments)?;
        url.query_pairs_mut()
            .append_pair("results-per-page", RESULTS_PER_PAGE);

        let mut resources = Vec::new();
        loop {
            let page: Page<E> = self.get_json(&url).await?;
            resources.extend(page.resources);

            match page.next_url {
                Some(next) if !next.is_empty() => url = follow(&self.api_url, &next)?,
                _ => break,
            }
        }

        debug!("Fetched {} resources from {}", resources.len(), segments.join("/"));
        Ok(resources)
    }
}

#[async_trait::async_trait]
impl PlatformApi for CloudFoundryClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        let resources = self.list_all::<OrganizationEntity>(&["v2", "organizations"]).await?;
        Ok(resources.into_iter().map(Organization::from).collect())
    }

    async fn list_spaces(&self, organization: &Organization) -> Result<Vec<Space>> {
        let resources = self
            .list_all::<SpaceEntity>(&["v2", "organizations", organization.guid.as_str(), "spaces"])
            .await?;
        Ok(resources.into_iter().map(Space::from).collect())
    }

    async fn space_summary(&self, space: &Space) -> Result<SpaceSummary> {
        let url = endpoint(&self.api_url, &["v2", "spaces", space.guid.as_str(), "summary"])?;
        self.get_json(&url).await
    }
}
