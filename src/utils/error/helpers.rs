//! Helper functions for creating specific error types

use super::types::ExporterError;

impl ExporterError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn api<U: Into<String>, M: Into<String>>(status: u16, url: U, message: M) -> Self {
        Self::Api {
            status,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Whether the error came back from the platform rather than from local setup
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::HttpClient(_) | Self::Api { .. } | Self::Auth(_) | Self::Serialization(_)
        )
    }
}
