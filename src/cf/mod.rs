//! Cloud Foundry v2 API client
//!
//! The refresh pipeline only depends on [`PlatformApi`]; [`CloudFoundryClient`]
//! is the production implementation.

mod api;
mod auth;
mod client;
mod types;


pub use api::PlatformApi;
pub use auth::{Credentials, TokenProvider};
pub use client::CloudFoundryClient;
pub use types::{AppSummary, Organization, Space, SpaceSummary};

use crate::utils::error::Result;
use url::Url;

/// Append path segments to `base`, keeping any path it already carries
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Resolve a `next_url` the API returns relative to its own root
fn follow(base: &Url, next: &str) -> Result<Url> {
    if let Ok(url) = Url::parse(next) {
        return Ok(url);
    }

    let (path, query) = next.split_once('?').unwrap_or((next, ""));
    let mut url = base.clone();
    url.set_path(&format!("{}{}", base.path().trim_end_matches('/'), path));
    url.set_query((!query.is_empty()).then_some(query));
    Ok(url)
}
