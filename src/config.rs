//! Client configuration
//!
//! [`ClientConfig`] carries everything the HTTP transport needs: credentials,
//! the project identifier, the API base URL, and the per-request timeout.

use std::time::Duration;

use crate::error::{RecallrAiError, Result};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.recallrai.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::RecallrAiClient`]
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use recallrai::ClientConfig;
///
/// let config = ClientConfig::new("rai_...", "project_...")
///     .with_timeout(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent as the `X-Api-Key` header
    pub api_key: String,
    /// Project identifier sent as the `X-Project-Id` header
    pub project_id: String,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout; expiry surfaces as a `Timeout` error and the
    /// request is abandoned client-side
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with the default base URL and timeout
    pub fn new(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project_id: project_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API base URL (e.g. for a staging environment)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`RecallrAiError::Validation`] when the API key or project ID
    /// is empty, or when the base URL does not parse as an HTTP(S) URL.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(RecallrAiError::Validation {
                message: "api_key must not be empty".to_string(),
                status: 0,
            });
        }
        if self.project_id.trim().is_empty() {
            return Err(RecallrAiError::Validation {
                message: "project_id must not be empty".to_string(),
                status: 0,
            });
        }
        let url = url::Url::parse(&self.base_url).map_err(|e| RecallrAiError::Validation {
            message: format!("base_url is not a valid URL: {}", e),
            status: 0,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RecallrAiError::Validation {
                message: format!("base_url must be http(s), got '{}'", url.scheme()),
                status: 0,
            });
        }
        Ok(())
    }
}
