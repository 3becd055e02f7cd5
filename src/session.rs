//! Session lifecycle controller
//!
//! A [`Session`] handle owns an immutable [`SessionData`] snapshot and
//! mediates every operation that depends on the session's lifecycle state.
//! The snapshot is replaced wholesale after each successful refreshing call;
//! mutating operations take `&mut self`, so concurrent tasks sharing a handle
//! must serialize access themselves (the library holds no locks).
//!
//! Local state guards are pure optimizations: the server is always the final
//! authority, because state can change out-of-band (auto-processing after an
//! inactivity timeout, balance exhaustion). [`Session::refresh`] is the only
//! way to observe such server-driven transitions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::classifier::{classify, CallContext, Operation, ResourceKind};
use crate::error::{RecallrAiError, Result};
use crate::transport::{Method, Transport};
use crate::types::{
    decode, page_query, Context, ContextOptions, MessageList, MessageRole, Metadata, SessionData,
    SessionStatus,
};

/// Handle to one conversation session
///
/// Obtained from `User::create_session` or `User::get_session`. All
/// network-calling methods are suspension points; none spawn background work.
pub struct Session {
    transport: Arc<dyn Transport>,
    user_id: String,
    snapshot: SessionData,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(crate) fn new(transport: Arc<dyn Transport>, user_id: String, snapshot: SessionData) -> Self {
        Self {
            transport,
            user_id,
            snapshot,
        }
    }

    /// Server-assigned session identifier
    pub fn session_id(&self) -> &str {
        &self.snapshot.session_id
    }

    /// Lifecycle state as of the last snapshot; may be stale until
    /// [`Session::refresh`] is called
    pub fn status(&self) -> SessionStatus {
        self.snapshot.status
    }

    /// Caller-defined metadata as of the last snapshot
    pub fn metadata(&self) -> &Metadata {
        &self.snapshot.metadata
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.snapshot.created_at
    }

    fn base_path(&self) -> String {
        format!(
            "/api/v1/users/{}/sessions/{}",
            self.user_id, self.snapshot.session_id
        )
    }

    fn ctx(&self, op: Operation) -> CallContext<'_> {
        CallContext::new(ResourceKind::Session, op).for_user(&self.user_id)
    }

    /// Append a message to the session
    ///
    /// Fails fast with [`RecallrAiError::InvalidSessionState`] when the
    /// cached status is terminal, without touching the network. Otherwise
    /// the server decides: a 400 is surfaced as `InvalidSessionState` even
    /// when the local cache believed the state was compatible. Success does
    /// not mutate the local snapshot (the message list is never cached).
    ///
    /// # Errors
    ///
    /// `InvalidSessionState`, `SessionNotFound` / `UserNotFound`, or a
    /// transport/server kind.
    pub async fn add_message(
        &self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<()> {
        if self.snapshot.status.is_terminal() {
            return Err(RecallrAiError::InvalidSessionState {
                message: format!(
                    "session {} is {} and no longer accepts messages",
                    self.snapshot.session_id, self.snapshot.status
                ),
            });
        }

        let body = json!({ "message": content.into(), "role": role });
        let response = self
            .transport
            .send(
                Method::Post,
                &format!("{}/add-message", self.base_path()),
                &[],
                Some(body),
            )
            .await?;
        classify(&self.ctx(Operation::AddMessage), &response)
    }

    /// Request a synthesized context for the session
    ///
    /// Read-only and allowed in any state. Calling this on a session that is
    /// already `Processing`/`Processed` is rarely what the caller wants
    /// (those memories have been, or are being, folded into long-term
    /// storage), so an advisory warning is logged; this is the sole
    /// non-fatal signal in the library. The result is never cached: the
    /// server is the source of truth and memory state can change between
    /// calls.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` / `UserNotFound`, `Decode`, or a transport/server
    /// kind.
    pub async fn get_context(&self, options: &ContextOptions) -> Result<Context> {
        if matches!(
            self.snapshot.status,
            SessionStatus::Processing | SessionStatus::Processed
        ) {
            tracing::warn!(
                session_id = %self.snapshot.session_id,
                status = %self.snapshot.status,
                "requesting context for a session whose memories are already being folded into long-term storage"
            );
        }

        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/context", self.base_path()),
                &options.to_query(),
                None,
            )
            .await?;
        classify(&self.ctx(Operation::Other), &response)?;
        decode(response.body)
    }

    /// Replace the session's metadata
    ///
    /// Metadata is descriptive, not part of the processing contract, so this
    /// is allowed in any state. On success the local snapshot is replaced
    /// with the server's response.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` / `UserNotFound`, `Decode`, or a transport/server
    /// kind.
    pub async fn update(&mut self, new_metadata: Metadata) -> Result<()> {
        let response = self
            .transport
            .send(
                Method::Put,
                &self.base_path(),
                &[],
                Some(json!({ "metadata": new_metadata })),
            )
            .await?;
        classify(&self.ctx(Operation::Other), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }

    /// Trigger server-side memory extraction for this session
    ///
    /// Fire-and-forget: a successful call means the server accepted the
    /// trigger, not that processing finished. Observe progress via
    /// [`Session::refresh`]. Fails fast with `InvalidSessionState` when the
    /// cached status already rules the call out; the server remains
    /// authoritative for the stale-cache case.
    ///
    /// # Errors
    ///
    /// `InvalidSessionState` when already processing/processed,
    /// `SessionNotFound` / `UserNotFound`, or a transport/server kind.
    pub async fn process(&self) -> Result<()> {
        if self.snapshot.status != SessionStatus::Pending {
            return Err(RecallrAiError::InvalidSessionState {
                message: format!(
                    "session {} is {} and cannot be processed again",
                    self.snapshot.session_id, self.snapshot.status
                ),
            });
        }

        let response = self
            .transport
            .send(
                Method::Post,
                &format!("{}/process", self.base_path()),
                &[],
                None,
            )
            .await?;
        classify(&self.ctx(Operation::Process), &response)
    }

    /// Re-fetch the session from the server and replace the local snapshot
    ///
    /// The only way to observe server-driven transitions (auto-processing,
    /// balance exhaustion) without calling a mutating operation.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` / `UserNotFound`, `Decode`, or a transport/server
    /// kind.
    pub async fn refresh(&mut self) -> Result<()> {
        let response = self
            .transport
            .send(Method::Get, &self.base_path(), &[], None)
            .await?;
        classify(&self.ctx(Operation::Other), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }

    /// Fetch a page of the session's messages
    ///
    /// Ordering is server-assigned and stable; the client never reorders or
    /// deduplicates.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` / `UserNotFound`, `Decode`, or a transport/server
    /// kind.
    pub async fn get_messages(&self, offset: u32, limit: u32) -> Result<MessageList> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/messages", self.base_path()),
                &page_query(offset, limit),
                None,
            )
            .await?;
        classify(&self.ctx(Operation::Other), &response)?;
        decode(response.body)
    }
}
