//! HTTPS transport for the RecallrAI API
//!
//! [`HttpTransport`] owns a `reqwest::Client` configured with the per-request
//! timeout from [`ClientConfig`] and attaches the `X-Api-Key` and
//! `X-Project-Id` headers to every request. It performs no retries and no
//! response interpretation beyond normalizing the body to JSON; status-code
//! semantics live in the response classifier.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{RecallrAiError, Result};
use crate::transport::{Method, RawResponse, Transport};

/// API key header attached to every request
const API_KEY_HEADER: &str = "X-Api-Key";
/// Project identifier header attached to every request
const PROJECT_ID_HEADER: &str = "X-Project-Id";

/// reqwest-backed [`Transport`] implementation
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    project_id: String,
}

impl HttpTransport {
    /// Build a transport from a validated [`ClientConfig`]
    ///
    /// # Errors
    ///
    /// Returns [`RecallrAiError::Connection`] if the underlying HTTP client
    /// fails to initialize (TLS backend failure).
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("recallrai-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RecallrAiError::Connection {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            project_id: config.project_id.clone(),
        })
    }

    fn map_send_error(&self, method: Method, path: &str, err: reqwest::Error) -> RecallrAiError {
        if err.is_timeout() {
            RecallrAiError::Timeout {
                message: format!("{} {} exceeded the configured timeout", method, path),
            }
        } else {
            RecallrAiError::Connection {
                message: format!("{} {} failed: {}", method, path, err),
            }
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<RawResponse> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        request = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(PROJECT_ID_HEADER, &self.project_id);

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(json_body) = body {
            request = request.json(&json_body);
        }

        tracing::debug!(%method, path, "sending RecallrAI API request");

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(method, path, e))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_send_error(method, path, e))?;

        // Empty bodies (e.g. DELETE acknowledgements) normalize to Null;
        // non-JSON bodies are preserved verbatim for the classifier.
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::debug!(%method, path, status, "received RecallrAI API response");

        Ok(RawResponse { status, body })
    }
}
