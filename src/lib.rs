//! RecallrAI - Rust SDK for the RecallrAI contextual memory service
//!
//! This library provides an async client for RecallrAI: create users, open
//! conversation sessions, append messages, request synthesized context
//! derived from stored memories, and resolve server-detected merge conflicts
//! by answering clarifying questions.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: client entry point and user CRUD
//! - `user`: user handle; façade for sessions, conflicts, and memories
//! - `session`: session lifecycle controller
//! - `merge_conflict`: merge conflict lifecycle controller
//! - `classifier`: maps raw `{status, body}` responses to typed errors
//! - `transport`: transport trait, HTTP implementation, and test fake
//! - `types`: wire DTOs, lifecycle enums, pagination types
//! - `config`: client configuration
//! - `error`: error taxonomy and result alias
//!
//! Lifecycle handles cache an immutable snapshot of their server state and
//! replace it wholesale after each refreshing call. Local state guards are
//! optimizations only; the server is always the final authority. The library
//! performs no retries and spawns no background work: transient failures are
//! typed (`Timeout`, `Connection`, `InternalServer`, `RateLimit`) so callers
//! can apply their own backoff policy.
//!
//! # Example
//!
//! ```no_run
//! use recallrai::{ClientConfig, RecallrAiClient};
//! use recallrai::types::{ContextOptions, MessageRole, RecallStrategy};
//!
//! #[tokio::main]
//! async fn main() -> recallrai::Result<()> {
//!     let client = RecallrAiClient::new(ClientConfig::new("rai_...", "project_..."))?;
//!
//!     let user = client.create_user("alice", None).await?;
//!     let mut session = user.create_session(None).await?;
//!
//!     session.add_message(MessageRole::User, "I moved to Helsinki").await?;
//!     let context = session
//!         .get_context(&ContextOptions::default().recall_strategy(RecallStrategy::Balanced))
//!         .await?;
//!     println!("{}", context.context);
//!
//!     session.process().await?;
//!     session.refresh().await?;
//!
//!     for conflict in user.list_merge_conflicts(0, 10).await?.merge_conflicts {
//!         println!("conflict: {}", conflict.new_memory_content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod merge_conflict;
pub mod session;
pub mod transport;
pub mod types;
pub mod user;

// Re-export commonly used types
pub use client::RecallrAiClient;
pub use config::ClientConfig;
pub use error::{RecallrAiError, Result};
pub use merge_conflict::MergeConflict;
pub use session::Session;
pub use user::User;
