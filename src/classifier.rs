//! Response classifier: `{status, body}` to typed errors
//!
//! This is the only place raw HTTP detail is interpreted. Given a
//! [`RawResponse`] plus enough call context to disambiguate overloaded status
//! codes, [`classify`] either passes (2xx) or produces exactly one
//! [`RecallrAiError`] kind. The function is stateless and referentially
//! transparent.
//!
//! The substring rules below are server-contract behavior: the backend
//! reports domain errors through its `detail` message, and the exact strings
//! matched here must track what the live API emits. Disambiguation fallbacks
//! are deterministic (404 without a recognizable user reference maps to the
//! narrower resource kind).

use serde_json::Value;

use crate::error::{RecallrAiError, Result};
use crate::transport::RawResponse;

/// The entity a call is scoped to; decides the narrow 404 fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// User-scoped call
    User,
    /// Session-scoped call
    Session,
    /// Merge-conflict-scoped call
    MergeConflict,
}

/// The operation being classified; decides 409/400/422 interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /users` (409 means the user ID is taken)
    CreateUser,
    /// `POST .../add-message` (400 means the session state forbids it)
    AddMessage,
    /// `POST .../process` (400 means the session state forbids it)
    Process,
    /// `POST .../resolve` (400/409 mean already resolved; 422 is refined)
    ResolveConflict,
    /// Everything else
    Other,
}

/// Call context handed to [`classify`] alongside the raw response
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    /// Expected entity kind for 404 fallback
    pub resource: ResourceKind,
    /// Operation, for status codes whose meaning depends on the endpoint
    pub op: Operation,
    /// The acting user's identifier, for 404 disambiguation
    pub user_id: Option<&'a str>,
}

impl<'a> CallContext<'a> {
    /// Context for a call with no special status-code overloads
    pub fn new(resource: ResourceKind, op: Operation) -> Self {
        Self {
            resource,
            op,
            user_id: None,
        }
    }

    /// Attach the acting user's identifier for 404 disambiguation
    pub fn for_user(mut self, user_id: &'a str) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Extract the human-readable error message from a response body
///
/// The backend reports errors as `{"detail": "..."}`; some proxies use
/// `{"message": "..."}`. Anything else falls back to the serialized body so
/// no signal is lost.
fn error_message(body: &Value) -> String {
    if let Some(detail) = body.get("detail").and_then(Value::as_str) {
        return detail.to_string();
    }
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    match body {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Map a 404 to the user-level or resource-level NotFound kind
///
/// Primary signal: the error message references the acting user's
/// identifier. Fallback when the signal is absent or ambiguous: the narrower,
/// more specific kind for the call's resource.
fn classify_not_found(ctx: &CallContext<'_>, message: String) -> RecallrAiError {
    let references_user = ctx
        .user_id
        .map(|uid| !uid.is_empty() && message.contains(uid))
        .unwrap_or(false);

    if references_user || ctx.resource == ResourceKind::User {
        return RecallrAiError::UserNotFound { message };
    }
    match ctx.resource {
        ResourceKind::Session => RecallrAiError::SessionNotFound { message },
        ResourceKind::MergeConflict => RecallrAiError::MergeConflictNotFound { message },
        ResourceKind::User => unreachable!("handled above"),
    }
}

/// Refine a 422 on the conflict-resolution endpoint by message substrings
///
/// Precedence: missing/required beats invalid+answer beats question, so a
/// compound message like "missing answers for required questions" resolves to
/// the most specific kind.
fn classify_resolution_422(message: String) -> RecallrAiError {
    let lower = message.to_lowercase();
    if lower.contains("missing") || lower.contains("required") {
        RecallrAiError::MissingAnswers { message }
    } else if lower.contains("invalid") && lower.contains("answer") {
        RecallrAiError::InvalidAnswer { message }
    } else if lower.contains("question") {
        RecallrAiError::InvalidQuestions { message }
    } else {
        RecallrAiError::Validation {
            message,
            status: 422,
        }
    }
}

/// Classify a raw API response against the error taxonomy
///
/// Returns `Ok(())` for any 2xx status regardless of body shape (decoding
/// the body is the caller's concern). Every non-2xx status maps to exactly
/// one [`RecallrAiError`] kind per the rules documented on each branch.
///
/// # Errors
///
/// The typed error corresponding to the response, per the taxonomy.
pub fn classify(ctx: &CallContext<'_>, response: &RawResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }

    let message = error_message(&response.body);
    let status = response.status;

    let error = match status {
        401 => RecallrAiError::Authentication { message },
        404 => classify_not_found(ctx, message),
        409 => match ctx.op {
            Operation::CreateUser => RecallrAiError::UserAlreadyExists { message },
            Operation::ResolveConflict => RecallrAiError::AlreadyResolved { message },
            _ => RecallrAiError::Api { message, status },
        },
        400 => match ctx.op {
            Operation::AddMessage | Operation::Process => {
                RecallrAiError::InvalidSessionState { message }
            }
            // Some backend revisions report a stale resolution as 400
            // rather than 409.
            Operation::ResolveConflict if message.to_lowercase().contains("resolved") => {
                RecallrAiError::AlreadyResolved { message }
            }
            _ => RecallrAiError::Validation { message, status },
        },
        422 => match ctx.op {
            Operation::ResolveConflict => classify_resolution_422(message),
            _ if ctx.resource == ResourceKind::User
                && message.to_lowercase().contains("categor") =>
            {
                RecallrAiError::InvalidCategories { message }
            }
            _ => RecallrAiError::Validation { message, status },
        },
        429 => RecallrAiError::RateLimit {
            retry_after: response.body.get("retry_after").and_then(Value::as_u64),
            message,
        },
        500..=599 => RecallrAiError::InternalServer { message, status },
        _ => RecallrAiError::Api { message, status },
    };

    Err(error)
}
