//! Wire types for the RecallrAI API
//!
//! DTOs, lifecycle enums, and pagination types shared by the client, the
//! lifecycle controllers, and the user façade. Field names are snake_case on
//! the wire and map mechanically onto the Rust structs via serde; enum values
//! serialize as snake_case strings.
//!
//! Snapshot types (`SessionData`, `MergeConflictData`, `UserData`) are
//! immutable values: a lifecycle handle replaces its snapshot wholesale after
//! every successful refreshing call, never field-by-field.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RecallrAiError, Result};

/// Decode a 2xx response body into a typed DTO
///
/// # Errors
///
/// Returns [`RecallrAiError::Decode`] when the body does not match the
/// expected shape.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| RecallrAiError::Decode {
        message: e.to_string(),
    })
}

/// Caller-defined open key/value metadata map
pub type Metadata = HashMap<String, Value>;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Lifecycle state of a session
///
/// Transitions are monotonic: `Pending -> Processing -> Processed`, with
/// `Failed` reachable from the non-terminal states and `InsufficientBalance`
/// a parallel terminal state driven by account balance exhaustion. All
/// transitions happen server-side; the client observes them via refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting messages; processing has not started
    Pending,
    /// Memory extraction is in flight
    Processing,
    /// Messages have been folded into long-term memory (terminal)
    Processed,
    /// Processing failed server-side (terminal)
    Failed,
    /// The account ran out of balance (terminal)
    InsufficientBalance,
}

impl SessionStatus {
    /// Whether the session can never change state again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Processed | Self::Failed | Self::InsufficientBalance
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Processed => write!(f, "processed"),
            Self::Failed => write!(f, "failed"),
            Self::InsufficientBalance => write!(f, "insufficient_balance"),
        }
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    /// The end user
    User,
    /// The assistant
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message within a session; ordering is append-only and server-assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    /// Message author
    pub role: MessageRole,
    /// Message text
    pub content: String,
    /// Server-assigned arrival timestamp
    pub timestamp: DateTime<Utc>,
}

/// Immutable session snapshot as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// Server-assigned opaque identifier
    pub session_id: String,
    /// Current lifecycle state
    pub status: SessionStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Server-side memory-retrieval policy controlling the cost/quality tradeoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallStrategy {
    /// Cheapest retrieval, lowest latency
    LowLatency,
    /// Default cost/quality balance
    Balanced,
    /// Multi-step agentic recall with a reasoning trace
    Agentic,
    /// Let the server pick
    Auto,
}

impl RecallStrategy {
    /// Wire value used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowLatency => "low_latency",
            Self::Balanced => "balanced",
            Self::Agentic => "agentic",
            Self::Auto => "auto",
        }
    }
}

impl std::fmt::Display for RecallStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for `Session::get_context`
///
/// Every field is optional; unset fields are omitted from the query string
/// and take server-defined defaults.
///
/// # Examples
///
/// ```
/// use recallrai::types::{ContextOptions, RecallStrategy};
///
/// let options = ContextOptions::default()
///     .recall_strategy(RecallStrategy::Agentic)
///     .max_top_k(20)
///     .timezone("Europe/Helsinki");
/// assert_eq!(options.to_query().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    recall_strategy: Option<RecallStrategy>,
    min_top_k: Option<u32>,
    max_top_k: Option<u32>,
    memories_threshold: Option<f64>,
    summaries_threshold: Option<f64>,
    last_n_messages: Option<u32>,
    last_n_summaries: Option<u32>,
    timezone: Option<String>,
    include_system_prompt: Option<bool>,
}

impl ContextOptions {
    /// Set the recall strategy
    pub fn recall_strategy(mut self, strategy: RecallStrategy) -> Self {
        self.recall_strategy = Some(strategy);
        self
    }

    /// Minimum number of memories to retrieve
    pub fn min_top_k(mut self, value: u32) -> Self {
        self.min_top_k = Some(value);
        self
    }

    /// Maximum number of memories to retrieve
    pub fn max_top_k(mut self, value: u32) -> Self {
        self.max_top_k = Some(value);
        self
    }

    /// Similarity threshold for memory retrieval
    pub fn memories_threshold(mut self, value: f64) -> Self {
        self.memories_threshold = Some(value);
        self
    }

    /// Similarity threshold for summary retrieval
    pub fn summaries_threshold(mut self, value: f64) -> Self {
        self.summaries_threshold = Some(value);
        self
    }

    /// How many trailing messages to fold into the prompt
    pub fn last_n_messages(mut self, value: u32) -> Self {
        self.last_n_messages = Some(value);
        self
    }

    /// How many trailing session summaries to fold into the prompt
    pub fn last_n_summaries(mut self, value: u32) -> Self {
        self.last_n_summaries = Some(value);
        self
    }

    /// IANA timezone used for timestamp rendering in the context
    pub fn timezone(mut self, value: impl Into<String>) -> Self {
        self.timezone = Some(value.into());
        self
    }

    /// Whether to prepend the default system prompt
    pub fn include_system_prompt(mut self, value: bool) -> Self {
        self.include_system_prompt = Some(value);
        self
    }

    /// Serialize the set fields as query parameters
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(strategy) = self.recall_strategy {
            query.push(("recall_strategy".to_string(), strategy.as_str().to_string()));
        }
        if let Some(v) = self.min_top_k {
            query.push(("min_top_k".to_string(), v.to_string()));
        }
        if let Some(v) = self.max_top_k {
            query.push(("max_top_k".to_string(), v.to_string()));
        }
        if let Some(v) = self.memories_threshold {
            query.push(("memories_threshold".to_string(), v.to_string()));
        }
        if let Some(v) = self.summaries_threshold {
            query.push(("summaries_threshold".to_string(), v.to_string()));
        }
        if let Some(v) = self.last_n_messages {
            query.push(("last_n_messages".to_string(), v.to_string()));
        }
        if let Some(v) = self.last_n_summaries {
            query.push(("last_n_summaries".to_string(), v.to_string()));
        }
        if let Some(ref v) = self.timezone {
            query.push(("timezone".to_string(), v.clone()));
        }
        if let Some(v) = self.include_system_prompt {
            query.push(("include_system_prompt".to_string(), v.to_string()));
        }
        query
    }
}

/// One memory that contributed to a synthesized context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryHit {
    /// Memory text
    pub content: String,
    /// Retrieval similarity score, when the server reports one
    #[serde(default)]
    pub score: Option<f64>,
    /// Session the memory was extracted from, when known
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Provenance and diagnostics attached to a synthesized context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextMetadata {
    /// Memories that contributed to the context
    #[serde(default)]
    pub memories_used: Option<Vec<MemoryHit>>,
    /// Sessions whose summaries were folded in
    #[serde(default)]
    pub sessions_covered: Option<Vec<String>>,
    /// Reasoning trace (agentic recall strategy only)
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Server-synthesized context; ephemeral, recomputed on every request and
/// never cached by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Context {
    /// Synthesized context text
    pub context: String,
    /// Optional provenance metadata
    #[serde(default)]
    pub metadata: Option<ContextMetadata>,
}

// ---------------------------------------------------------------------------
// Merge conflicts
// ---------------------------------------------------------------------------

/// Lifecycle state of a merge conflict
///
/// `Pending -> InQueue -> Resolving -> Resolved`, with `Failed` reachable
/// from any non-terminal state. Creation is server-driven, as a byproduct of
/// session processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeConflictStatus {
    /// Detected, awaiting resolution
    Pending,
    /// Resolution request accepted, queued server-side
    InQueue,
    /// Resolution in flight
    Resolving,
    /// Resolved (terminal)
    Resolved,
    /// Resolution failed (terminal)
    Failed,
}

impl MergeConflictStatus {
    /// Whether the conflict can never change state again
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Failed)
    }
}

impl std::fmt::Display for MergeConflictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InQueue => write!(f, "in_queue"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// An existing memory that contradicts the newly extracted one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictingMemory {
    /// The stored memory's text
    pub content: String,
    /// Why the server considers it in conflict
    pub reason: String,
}

/// A server-posed multiple-choice question disambiguating a conflict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    /// Question text; answers are keyed by this exact string
    pub question: String,
    /// Permitted answer values
    pub options: Vec<String>,
}

/// One answer to a clarifying question (input-only value object)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConflictAnswer {
    /// The question being answered, by exact text
    pub question: String,
    /// The chosen value; must be one of the question's options
    pub answer: String,
    /// Free-text justification; never validated against the question set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MergeConflictAnswer {
    /// Answer a question with one of its options
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            message: None,
        }
    }

    /// Attach a free-text justification
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Immutable merge-conflict snapshot as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConflictData {
    /// Server-assigned opaque identifier
    pub conflict_id: String,
    /// Current lifecycle state
    pub status: MergeConflictStatus,
    /// The newly extracted memory that triggered the conflict
    pub new_memory_content: String,
    /// Stored memories it contradicts, with reasons
    #[serde(default)]
    pub conflicting_memories: Vec<ConflictingMemory>,
    /// Questions that must all be answered to resolve the conflict
    #[serde(default)]
    pub clarifying_questions: Vec<ClarifyingQuestion>,
    /// Detection timestamp
    pub created_at: DateTime<Utc>,
    /// Resolution timestamp; present only once resolved
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
    /// Opaque resolution payload; present only once resolved
    #[serde(default)]
    pub resolution_data: Option<Metadata>,
}

// ---------------------------------------------------------------------------
// Users and memories
// ---------------------------------------------------------------------------

/// Immutable user snapshot as returned by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    /// Caller-chosen opaque identifier
    pub user_id: String,
    /// Caller-defined metadata
    #[serde(default)]
    pub metadata: Metadata,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp, when the server tracks one
    #[serde(default)]
    pub last_active_at: Option<DateTime<Utc>>,
}

/// One stored long-term memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    /// Server-assigned opaque identifier
    pub memory_id: String,
    /// Memory text
    pub content: String,
    /// Project-defined categories this memory belongs to
    #[serde(default)]
    pub categories: Vec<String>,
    /// Extraction timestamp
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Serialize offset/limit pagination as query parameters
pub(crate) fn page_query(offset: u32, limit: u32) -> Vec<(String, String)> {
    vec![
        ("offset".to_string(), offset.to_string()),
        ("limit".to_string(), limit.to_string()),
    ]
}

/// A page of users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    /// Users in this page
    pub users: Vec<UserData>,
    /// Total matching users
    #[serde(default)]
    pub total: u64,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// A page of sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionList {
    /// Sessions in this page
    pub sessions: Vec<SessionData>,
    /// Total matching sessions
    #[serde(default)]
    pub total: u64,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// A page of a session's messages; ordering is server-assigned and stable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    /// Messages in this page
    pub messages: Vec<SessionMessage>,
    /// Total messages in the session
    #[serde(default)]
    pub total: u64,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// A page of merge conflicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConflictList {
    /// Conflicts in this page
    pub merge_conflicts: Vec<MergeConflictData>,
    /// Total matching conflicts
    #[serde(default)]
    pub total: u64,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// A page of stored memories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryList {
    /// Memories in this page
    pub memories: Vec<MemoryItem>,
    /// Total matching memories
    #[serde(default)]
    pub total: u64,
    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}
