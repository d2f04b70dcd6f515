//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.

use cf_applications_exporter::Config;
use cf_applications_exporter::cf::AppSummary;

/// Factory for application summaries as returned by a space summary
pub struct AppFactory;

impl AppFactory {
    /// A started application with two of three instances running
    pub fn started(guid: &str, name: &str) -> AppSummary {
        AppSummary {
            guid: guid.to_string(),
            name: name.to_string(),
            instances: 3,
            running_instances: Some(2),
            memory: 512,
            disk_quota: 1024,
            stack_guid: "cflinuxfs4".to_string(),
            state: "STARTED".to_string(),
            buildpack: Some("java_buildpack".to_string()),
            detected_buildpack: Some("java 4.x".to_string()),
        }
    }

    /// A stopped application the platform has no running count for
    pub fn stopped(guid: &str, name: &str) -> AppSummary {
        AppSummary {
            running_instances: None,
            state: "STOPPED".to_string(),
            buildpack: None,
            detected_buildpack: None,
            ..Self::started(guid, name)
        }
    }
}

/// Factory for exporter configuration
pub struct ConfigFactory;

impl ConfigFactory {
    /// Valid configuration pointing at `api_url` with user credentials
    pub fn with_api(api_url: &str) -> Config {
        let mut config = Config::default();
        config.cf.api_url = api_url.to_string();
        config.cf.username = Some("admin".to_string());
        config.cf.password = Some("admin-secret".to_string());
        config.exporter.environment = "test".to_string();
        config.exporter.deployment = "cf-test".to_string();
        config
    }

    /// Same as [`ConfigFactory::with_api`] but using client credentials
    pub fn with_client(api_url: &str) -> Config {
        let mut config = Self::with_api(api_url);
        config.cf.username = None;
        config.cf.password = None;
        config.cf.client_id = Some("exporter".to_string());
        config.cf.client_secret = Some("client-secret".to_string());
        config
    }
}
