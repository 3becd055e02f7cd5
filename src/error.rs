//! Error types for the RecallrAI SDK
//!
//! This module defines the closed set of error kinds every remote operation
//! can fail with, using `thiserror` for ergonomic error handling. Callers can
//! pattern-match exhaustively: no operation ever surfaces an untyped failure.

use thiserror::Error;

/// Main error type for RecallrAI operations
///
/// Each variant identifies a precise remediation path: fix credentials
/// (`Authentication`), retry later (`Timeout`, `Connection`,
/// `InternalServer`, `RateLimit`), change the input (`Validation` and the
/// domain validation kinds), or treat as a logically-expected outcome
/// (`AlreadyResolved`). The library itself never retries.
#[derive(Error, Debug)]
pub enum RecallrAiError {
    /// Invalid API key or project ID (HTTP 401)
    #[error("Authentication error: {message}")]
    Authentication {
        /// Server-supplied detail message
        message: String,
    },

    /// The request exceeded the configured timeout; the underlying request
    /// is abandoned client-side with no guarantee the server aborted it
    #[error("Request timed out: {message}")]
    Timeout {
        /// Description of the timed-out request
        message: String,
    },

    /// DNS resolution or TCP/TLS connection failure
    #[error("Connection error: {message}")]
    Connection {
        /// Transport-level failure detail
        message: String,
    },

    /// Server-side failure (HTTP 5xx)
    #[error("Internal server error (HTTP {status}): {message}")]
    InternalServer {
        /// Server-supplied detail message
        message: String,
        /// The originating 5xx status code
        status: u16,
    },

    /// Too many requests (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Server-supplied detail message
        message: String,
        /// Seconds to wait before retrying, when the server supplies a hint
        retry_after: Option<u64>,
    },

    /// Malformed or semantically invalid request parameters
    #[error("Validation error: {message}")]
    Validation {
        /// Server-supplied detail message
        message: String,
        /// The originating status code (400 or 422)
        status: u16,
    },

    /// The referenced user does not exist (HTTP 404)
    #[error("User not found: {message}")]
    UserNotFound {
        /// Server-supplied detail message
        message: String,
    },

    /// A user with the requested ID already exists (HTTP 409)
    #[error("User already exists: {message}")]
    UserAlreadyExists {
        /// Server-supplied detail message
        message: String,
    },

    /// One or more requested memory categories are not defined for the project
    #[error("Invalid categories: {message}")]
    InvalidCategories {
        /// Server-supplied detail message
        message: String,
    },

    /// The referenced session does not exist (HTTP 404)
    #[error("Session not found: {message}")]
    SessionNotFound {
        /// Server-supplied detail message
        message: String,
    },

    /// The operation is incompatible with the session's lifecycle state
    #[error("Invalid session state: {message}")]
    InvalidSessionState {
        /// Detail message (server-supplied, or local guard description)
        message: String,
    },

    /// The referenced merge conflict does not exist (HTTP 404)
    #[error("Merge conflict not found: {message}")]
    MergeConflictNotFound {
        /// Server-supplied detail message
        message: String,
    },

    /// The merge conflict has already reached a terminal state
    #[error("Merge conflict already resolved: {message}")]
    AlreadyResolved {
        /// Detail message (server-supplied, or local guard description)
        message: String,
    },

    /// The submitted answers reference questions outside the conflict's
    /// clarifying question set
    #[error("Invalid questions: {message}")]
    InvalidQuestions {
        /// Server-supplied detail message
        message: String,
    },

    /// One or more clarifying questions were left unanswered
    #[error("Missing answers: {message}")]
    MissingAnswers {
        /// Server-supplied detail message
        message: String,
    },

    /// An answer value is not among its question's options
    #[error("Invalid answer: {message}")]
    InvalidAnswer {
        /// Server-supplied detail message
        message: String,
    },

    /// Any other non-2xx response; forward-compatibility carrier for
    /// undocumented status codes
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// Server-supplied detail message or raw body
        message: String,
        /// The originating status code
        status: u16,
    },

    /// A 2xx response body that failed to deserialize into the expected type
    #[error("Failed to decode response: {message}")]
    Decode {
        /// Deserialization failure detail
        message: String,
    },
}

impl RecallrAiError {
    /// The HTTP status code this error originated from, when applicable
    ///
    /// Pure transport failures (`Timeout`, `Connection`) and decode failures
    /// have no status. Kinds with a fixed wire code report their canonical
    /// status.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Timeout { .. } | Self::Connection { .. } | Self::Decode { .. } => None,
            Self::InternalServer { status, .. }
            | Self::Validation { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::RateLimit { .. } => Some(429),
            Self::UserNotFound { .. }
            | Self::SessionNotFound { .. }
            | Self::MergeConflictNotFound { .. } => Some(404),
            Self::UserAlreadyExists { .. } | Self::AlreadyResolved { .. } => Some(409),
            Self::InvalidSessionState { .. } => Some(400),
            Self::InvalidCategories { .. }
            | Self::InvalidQuestions { .. }
            | Self::MissingAnswers { .. }
            | Self::InvalidAnswer { .. } => Some(422),
        }
    }

    /// Whether the failure is transient and a caller-driven retry (with
    /// backoff) may succeed without changing the request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::Connection { .. }
                | Self::InternalServer { .. }
                | Self::RateLimit { .. }
        )
    }
}

/// Result type alias for RecallrAI operations
pub type Result<T> = std::result::Result<T, RecallrAiError>;
