//! Transport abstraction for the RecallrAI API
//!
//! The [`Transport`] trait is the seam between the lifecycle controllers and
//! the network: it performs one request and yields a normalized
//! [`RawResponse`] (`{status, body}`) or a transport-level failure
//! (`Timeout`/`Connection`). Everything above this seam only ever sees
//! taxonomy-level errors produced by the response classifier.
//!
//! Implementations:
//!
//! - [`http::HttpTransport`] -- the real reqwest-backed transport
//! - [`fake::FakeTransport`] -- in-process scripted transport for tests

pub mod fake;
pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// HTTP method for a transport request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// HTTP GET
    Get,
    /// HTTP POST
    Post,
    /// HTTP PUT
    Put,
    /// HTTP DELETE
    Delete,
}

impl Method {
    /// The wire representation of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized API response: status code plus parsed JSON body
///
/// Empty and non-JSON bodies normalize to [`Value::Null`] and a
/// [`Value::String`] respectively, so the classifier always has something to
/// inspect.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Parsed response body
    pub body: Value,
}

impl RawResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Object-safe async transport performing one request per call
///
/// No retry, no coalescing, no background work: every call is a single
/// suspension point and the caller owns all sequencing.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the normalized response
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `path` - Absolute API path (e.g. `/api/v1/users/u1/sessions`)
    /// * `query` - Query parameters; empty slice for none
    /// * `body` - JSON request body, when the endpoint takes one
    ///
    /// # Errors
    ///
    /// Returns [`crate::RecallrAiError::Timeout`] when the configured
    /// per-request timeout expires and [`crate::RecallrAiError::Connection`]
    /// for any other transport-level failure. Non-2xx statuses are *not*
    /// errors at this layer; they come back as a [`RawResponse`] for the
    /// classifier to interpret.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<RawResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
        assert_eq!(Method::Put.as_str(), "PUT");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[test]
    fn test_raw_response_is_success() {
        let ok = RawResponse {
            status: 200,
            body: Value::Null,
        };
        let created = RawResponse {
            status: 201,
            body: Value::Null,
        };
        let redirect = RawResponse {
            status: 301,
            body: Value::Null,
        };
        let client_err = RawResponse {
            status: 404,
            body: Value::Null,
        };
        assert!(ok.is_success());
        assert!(created.is_success());
        assert!(!redirect.is_success());
        assert!(!client_err.is_success());
    }
}
