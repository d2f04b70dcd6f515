//! UAA token acquisition and caching

use super::endpoint;
use super::types::{Info, TokenResponse};
use crate::config::CfConfig;
use crate::utils::error::{ExporterError, Result};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

/// Public OAuth client used by the `cf` CLI for the password grant
const CF_CLI_CLIENT_ID: &str = "cf";

/// Refresh tokens this long before they expire
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Lifetime assumed when UAA omits `expires_in`
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(600);

/// Grant used to obtain bearer tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { username: String, password: String },
    ClientCredentials { client_id: String, client_secret: String },
}

impl Credentials {
    /// Pick the grant from config, preferring client credentials
    pub fn from_config(config: &CfConfig) -> Result<Self> {
        if config.has_client_credentials() {
            return Ok(Self::ClientCredentials {
                client_id: config.client_id.clone().unwrap_or_default(),
                client_secret: config.client_secret.clone().unwrap_or_default(),
            });
        }
        if config.has_user_credentials() {
            return Ok(Self::Password {
                username: config.username.clone().unwrap_or_default(),
                password: config.password.clone().unwrap_or_default(),
            });
        }
        Err(ExporterError::config(
            "No Cloud Foundry credentials configured",
        ))
    }
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct TokenState {
    token_endpoint: Option<Url>,
    token: Option<CachedToken>,
}

/// Hands out bearer tokens, discovering the UAA endpoint on first use
#[derive(Debug)]
pub struct TokenProvider {
    http: reqwest::Client,
    api_url: Url,
    credentials: Credentials,
    state: Mutex<TokenState>,
}

impl TokenProvider {
    pub fn new(http: reqwest::Client, api_url: Url, credentials: Credentials) -> Self {
        Self {
            http,
            api_url,
            credentials,
            state: Mutex::new(TokenState::default()),
        }
    }

    /// Return a valid access token, fetching a new one if needed.
    ///
    /// Concurrent callers serialize on the cache so an expired token is only
    /// refreshed once.
    pub async fn bearer_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(token) = &state.token {
            if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let token_endpoint = match &state.token_endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let endpoint = self.discover_token_endpoint().await?;
                state.token_endpoint = Some(endpoint.clone());
                endpoint
            }
        };

        let token = self.request_token(&token_endpoint).await?;
        let value = token.value.clone();
        state.token = Some(token);
        Ok(value)
    }

    /// Drop the cached token so the next call fetches a fresh one
    pub async fn invalidate(&self) {
        self.state.lock().await.token = None;
    }

    async fn discover_token_endpoint(&self) -> Result<Url> {
        let info_url = endpoint(&self.api_url, &["v2", "info"])?;
        debug!("Discovering token endpoint from {}", info_url);

        let response = self.http.get(info_url.clone()).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ExporterError::api(status, info_url.as_str(), message));
        }

        let info: Info = serde_json::from_slice(&response.bytes().await?)?;
        Ok(Url::parse(&info.token_endpoint)?)
    }

    async fn request_token(&self, token_endpoint: &Url) -> Result<CachedToken> {
        let token_url = endpoint(token_endpoint, &["oauth", "token"])?;

        let request = match &self.credentials {
            Credentials::Password { username, password } => self
                .http
                .post(token_url.clone())
                .basic_auth(CF_CLI_CLIENT_ID, Some(""))
                .form(&[
                    ("grant_type", "password"),
                    ("username", username.as_str()),
                    ("password", password.as_str()),
                ]),
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => self
                .http
                .post(token_url.clone())
                .basic_auth(client_id, Some(client_secret))
                .form(&[("grant_type", "client_credentials")]),
        };

        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ExporterError::auth(format!(
                "Token request to {} failed with {}",
                token_url, status
            )));
        }

        let token: TokenResponse = serde_json::from_slice(&response.bytes().await?)?;
        let lifetime = token
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);

        debug!("Obtained access token valid for {:?}", lifetime);
        Ok(CachedToken {
            value: token.access_token,
            expires_at: expiry(Instant::now(), lifetime),
        })
    }
}

/// Expiry instant for a token issued at `now`, falling back to the default
/// lifetime when UAA reports one `Instant` cannot represent
fn expiry(now: Instant, lifetime: Duration) -> Instant {
    now.checked_add(lifetime)
        .unwrap_or_else(|| now + DEFAULT_TOKEN_LIFETIME)
}
