//! Cloud Foundry API configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloud Foundry API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfConfig {
    /// Cloud Controller URL, e.g. `https://api.sys.example.com`
    #[serde(default)]
    pub api_url: String,
    /// User for the password grant
    pub username: Option<String>,
    pub password: Option<String>,
    /// UAA client for the client-credentials grant; preferred over username/password
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Accept self-signed certificates
    #[serde(default)]
    pub skip_ssl_validation: bool,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            username: None,
            password: None,
            client_id: None,
            client_secret: None,
            skip_ssl_validation: false,
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CfConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_client_credentials(&self) -> bool {
        is_set(&self.client_id) && is_set(&self.client_secret)
    }

    pub fn has_user_credentials(&self) -> bool {
        is_set(&self.username) && is_set(&self.password)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
