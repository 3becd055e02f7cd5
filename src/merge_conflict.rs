//! Merge conflict lifecycle controller
//!
//! A [`MergeConflict`] handle owns an immutable [`MergeConflictData`]
//! snapshot. Conflicts are created server-side as a byproduct of session
//! processing; the only client-driven state change is [`MergeConflict::resolve`],
//! which is an explicit two-phase check: a local fast-fail on an already
//! terminal cached status (an optimization, never authoritative, since the
//! cache can be stale) followed by authoritative server-side validation whose
//! rejection always wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::classifier::{classify, CallContext, Operation, ResourceKind};
use crate::error::{RecallrAiError, Result};
use crate::transport::{Method, Transport};
use crate::types::{
    decode, ClarifyingQuestion, ConflictingMemory, MergeConflictAnswer, MergeConflictData,
    MergeConflictStatus, Metadata,
};

/// Handle to one server-detected memory merge conflict
///
/// Obtained from `User::get_merge_conflict` or `User::list_merge_conflicts`.
/// Immutable once `Resolved` or `Failed`.
pub struct MergeConflict {
    transport: Arc<dyn Transport>,
    user_id: String,
    snapshot: MergeConflictData,
}

impl MergeConflict {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        user_id: String,
        snapshot: MergeConflictData,
    ) -> Self {
        Self {
            transport,
            user_id,
            snapshot,
        }
    }

    /// Server-assigned conflict identifier
    pub fn conflict_id(&self) -> &str {
        &self.snapshot.conflict_id
    }

    /// Lifecycle state as of the last snapshot; may be stale until
    /// [`MergeConflict::refresh`] is called
    pub fn status(&self) -> MergeConflictStatus {
        self.snapshot.status
    }

    /// The newly extracted memory that triggered the conflict
    pub fn new_memory_content(&self) -> &str {
        &self.snapshot.new_memory_content
    }

    /// Stored memories the new memory contradicts, with reasons
    pub fn conflicting_memories(&self) -> &[ConflictingMemory] {
        &self.snapshot.conflicting_memories
    }

    /// The question set a resolution must answer exactly
    pub fn clarifying_questions(&self) -> &[ClarifyingQuestion] {
        &self.snapshot.clarifying_questions
    }

    /// Resolution timestamp; `None` until resolved
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.resolved_at
    }

    /// Opaque resolution payload; `None` until resolved
    pub fn resolution_data(&self) -> Option<&Metadata> {
        self.snapshot.resolution_data.as_ref()
    }

    fn base_path(&self) -> String {
        format!(
            "/api/v1/users/{}/merge-conflicts/{}",
            self.user_id, self.snapshot.conflict_id
        )
    }

    fn ctx(&self, op: Operation) -> CallContext<'_> {
        CallContext::new(ResourceKind::MergeConflict, op).for_user(&self.user_id)
    }

    /// Resolve the conflict by answering its clarifying questions
    ///
    /// Resolution is all-or-nothing: the server requires exactly one answer
    /// per question in [`MergeConflict::clarifying_questions`], each answer
    /// drawn from that question's options. Partial sets are rejected as
    /// `MissingAnswers`; extra questions as `InvalidQuestions`; off-menu
    /// values as `InvalidAnswer`. The client sends the full answer set
    /// verbatim and never deduplicates.
    ///
    /// When the cached status is already terminal this fails with
    /// `AlreadyResolved` without a network call. On success the snapshot
    /// (`status`, `resolved_at`, `resolution_data`) is replaced with the
    /// server's authoritative response.
    ///
    /// # Errors
    ///
    /// `AlreadyResolved`, `MissingAnswers` / `InvalidQuestions` /
    /// `InvalidAnswer`, `MergeConflictNotFound` / `UserNotFound`, `Decode`,
    /// or a transport/server kind.
    pub async fn resolve(&mut self, answers: &[MergeConflictAnswer]) -> Result<()> {
        if self.snapshot.status.is_terminal() {
            return Err(RecallrAiError::AlreadyResolved {
                message: format!(
                    "merge conflict {} is already {}",
                    self.snapshot.conflict_id, self.snapshot.status
                ),
            });
        }

        let response = self
            .transport
            .send(
                Method::Post,
                &format!("{}/resolve", self.base_path()),
                &[],
                Some(json!({ "answers": answers })),
            )
            .await?;
        classify(&self.ctx(Operation::ResolveConflict), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }

    /// Re-fetch the conflict from the server and replace the local snapshot
    ///
    /// The only way to observe a resolution that happened through another
    /// process or channel.
    ///
    /// # Errors
    ///
    /// `MergeConflictNotFound` / `UserNotFound`, `Decode`, or a
    /// transport/server kind.
    pub async fn refresh(&mut self) -> Result<()> {
        let response = self
            .transport
            .send(Method::Get, &self.base_path(), &[], None)
            .await?;
        classify(&self.ctx(Operation::Other), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }
}
