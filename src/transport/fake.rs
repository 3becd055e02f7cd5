//! In-process fake transport for unit and integration tests
//!
//! [`FakeTransport`] replaces real network I/O in tests. Script it with
//! [`FakeTransport::push_response`] / [`FakeTransport::push_error`] (responses
//! are replayed in FIFO order), wire it into the code under test via
//! `RecallrAiClient::with_transport`, then assert on what was sent with
//! [`FakeTransport::requests`] and [`FakeTransport::call_count`].
//!
//! The zero-call assertions for the local lifecycle guards (terminal-state
//! `add_message`, already-resolved `resolve`) lean on `call_count()`.
//!
//! # Example
//!
//! ```
//! use recallrai::transport::fake::FakeTransport;
//! use recallrai::transport::{Method, Transport};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let transport = FakeTransport::new();
//! transport.push_response(200, json!({"ok": true}));
//!
//! let response = transport
//!     .send(Method::Get, "/api/v1/users/u1", &[], None)
//!     .await
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(transport.call_count(), 1);
//! assert_eq!(transport.requests()[0].path, "/api/v1/users/u1");
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{RecallrAiError, Result};
use crate::transport::{Method, RawResponse, Transport};

/// One request as observed by the fake transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: Method,
    /// Request path
    pub path: String,
    /// Query parameters in the order they were supplied
    pub query: Vec<(String, String)>,
    /// JSON request body, if any
    pub body: Option<Value>,
}

/// Scripted [`Transport`] implementation for tests
#[derive(Debug, Default)]
pub struct FakeTransport {
    responses: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    /// Create an empty fake transport with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `{status, body}` response for the next unanswered request
    pub fn push_response(&self, status: u16, body: Value) {
        self.responses
            .lock()
            .expect("FakeTransport response queue poisoned")
            .push_back(Ok(RawResponse { status, body }));
    }

    /// Queue a transport-level failure for the next unanswered request
    pub fn push_error(&self, error: RecallrAiError) {
        self.responses
            .lock()
            .expect("FakeTransport response queue poisoned")
            .push_back(Err(error));
    }

    /// Number of requests the code under test has issued
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .expect("FakeTransport request log poisoned")
            .len()
    }

    /// Snapshot of every request issued so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("FakeTransport request log poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    /// Record the request and replay the next scripted response
    ///
    /// # Errors
    ///
    /// Returns the scripted error when one was queued, or
    /// [`RecallrAiError::Connection`] when the script has run dry (which
    /// usually means the code under test made more calls than the test
    /// expected).
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<RawResponse> {
        self.requests
            .lock()
            .expect("FakeTransport request log poisoned")
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                query: query.to_vec(),
                body,
            });

        self.responses
            .lock()
            .expect("FakeTransport response queue poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(RecallrAiError::Connection {
                    message: format!(
                        "FakeTransport: no scripted response for {} {}",
                        method, path
                    ),
                })
            })
    }
}
