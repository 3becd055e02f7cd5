//! User handle and façade for sessions, merge conflicts, and memories
//!
//! A [`User`] wraps an immutable [`UserData`] snapshot and constructs the
//! [`Session`] and [`MergeConflict`] lifecycle handles. The listing methods
//! are mechanical pagination over server collections; all error behavior
//! flows through the response classifier.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::classifier::{classify, CallContext, Operation, ResourceKind};
use crate::error::Result;
use crate::merge_conflict::MergeConflict;
use crate::session::Session;
use crate::transport::{Method, Transport};
use crate::types::{
    decode, page_query, MemoryList, MergeConflictList, Metadata, SessionData, SessionList,
    UserData,
};

/// Handle to one RecallrAI user
///
/// Obtained from `RecallrAiClient::create_user` or
/// `RecallrAiClient::get_user`.
pub struct User {
    transport: Arc<dyn Transport>,
    snapshot: UserData,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl User {
    pub(crate) fn new(transport: Arc<dyn Transport>, snapshot: UserData) -> Self {
        Self {
            transport,
            snapshot,
        }
    }

    /// The user's identifier
    pub fn user_id(&self) -> &str {
        &self.snapshot.user_id
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
        format!("/api/v1/users/{}", self.snapshot.user_id)
    }

    fn user_ctx(&self) -> CallContext<'_> {
        CallContext::new(ResourceKind::User, Operation::Other).for_user(&self.snapshot.user_id)
    }

    /// Re-fetch the user and replace the local snapshot
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
    pub async fn refresh(&mut self) -> Result<()> {
        let response = self
            .transport
            .send(Method::Get, &self.base_path(), &[], None)
            .await?;
        classify(&self.user_ctx(), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }

    /// Replace the user's metadata
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
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
        classify(&self.user_ctx(), &response)?;
        self.snapshot = decode(response.body)?;
        Ok(())
    }

    /// Delete the user server-side, consuming the handle
    ///
    /// Sessions and memories owned by the user are removed by the server;
    /// any surviving handles will observe `UserNotFound` on next access.
    ///
    /// # Errors
    ///
    /// `UserNotFound` or a transport/server kind.
    pub async fn delete(self) -> Result<()> {
        let response = self
            .transport
            .send(Method::Delete, &self.base_path(), &[], None)
            .await?;
        classify(&self.user_ctx(), &response)
    }

    /// Start a new conversation session (initial status `Pending`)
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
    pub async fn create_session(&self, metadata: Option<Metadata>) -> Result<Session> {
        let body = json!({ "metadata": metadata.unwrap_or_default() });
        let response = self
            .transport
            .send(
                Method::Post,
                &format!("{}/sessions", self.base_path()),
                &[],
                Some(body),
            )
            .await?;
        classify(&self.user_ctx(), &response)?;
        let data: SessionData = decode(response.body)?;
        Ok(Session::new(
            Arc::clone(&self.transport),
            self.snapshot.user_id.clone(),
            data,
        ))
    }

    /// Fetch an existing session by ID and wrap it in a handle
    ///
    /// # Errors
    ///
    /// `SessionNotFound` / `UserNotFound`, `Decode`, or a transport/server
    /// kind.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/sessions/{}", self.base_path(), session_id),
                &[],
                None,
            )
            .await?;
        let ctx = CallContext::new(ResourceKind::Session, Operation::Other)
            .for_user(&self.snapshot.user_id);
        classify(&ctx, &response)?;
        let data: SessionData = decode(response.body)?;
        Ok(Session::new(
            Arc::clone(&self.transport),
            self.snapshot.user_id.clone(),
            data,
        ))
    }

    /// List the user's sessions, paginated
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
    pub async fn list_sessions(&self, offset: u32, limit: u32) -> Result<SessionList> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/sessions", self.base_path()),
                &page_query(offset, limit),
                None,
            )
            .await?;
        classify(&self.user_ctx(), &response)?;
        decode(response.body)
    }

    /// Fetch an existing merge conflict by ID and wrap it in a handle
    ///
    /// # Errors
    ///
    /// `MergeConflictNotFound` / `UserNotFound`, `Decode`, or a
    /// transport/server kind.
    pub async fn get_merge_conflict(&self, conflict_id: &str) -> Result<MergeConflict> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/merge-conflicts/{}", self.base_path(), conflict_id),
                &[],
                None,
            )
            .await?;
        let ctx = CallContext::new(ResourceKind::MergeConflict, Operation::Other)
            .for_user(&self.snapshot.user_id);
        classify(&ctx, &response)?;
        let data = decode(response.body)?;
        Ok(MergeConflict::new(
            Arc::clone(&self.transport),
            self.snapshot.user_id.clone(),
            data,
        ))
    }

    /// List the user's merge conflicts, paginated
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
    pub async fn list_merge_conflicts(&self, offset: u32, limit: u32) -> Result<MergeConflictList> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/merge-conflicts", self.base_path()),
                &page_query(offset, limit),
                None,
            )
            .await?;
        classify(&self.user_ctx(), &response)?;
        decode(response.body)
    }

    /// List the user's stored memories, paginated, optionally filtered by
    /// category
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `InvalidCategories` when a filter names an undefined
    /// category, `Decode`, or a transport/server kind.
    pub async fn list_memories(
        &self,
        offset: u32,
        limit: u32,
        categories: Option<&[String]>,
    ) -> Result<MemoryList> {
        let mut query = page_query(offset, limit);
        if let Some(categories) = categories {
            for category in categories {
                query.push(("categories".to_string(), category.clone()));
            }
        }
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("{}/memories", self.base_path()),
                &query,
                None,
            )
            .await?;
        classify(&self.user_ctx(), &response)?;
        decode(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecallrAiError;
    use crate::transport::fake::FakeTransport;
    use crate::types::SessionStatus;
    use serde_json::{json, Value};

    fn snapshot() -> UserData {
        serde_json::from_value(json!({
            "user_id": "alice",
            "metadata": {"plan": "pro"},
            "created_at": "2026-08-27T09:00:00Z"
        }))
        .unwrap()
    }

    fn user(transport: &Arc<FakeTransport>) -> User {
        User::new(Arc::clone(transport) as Arc<dyn Transport>, snapshot())
    }

    fn session_body(status: &str) -> Value {
        json!({
            "session_id": "sess_1",
            "status": status,
            "created_at": "2026-08-27T10:00:00Z",
            "metadata": {}
        })
    }

    #[tokio::test]
    async fn test_create_session_returns_pending_handle() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(200, session_body("pending"));
        let user = user(&transport);

        let session = user.create_session(None).await.unwrap();

        assert_eq!(session.session_id(), "sess_1");
        assert_eq!(session.status(), SessionStatus::Pending);
        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/api/v1/users/alice/sessions");
        assert_eq!(requests[0].body, Some(json!({"metadata": {}})));
    }

    #[tokio::test]
    async fn test_create_session_forwards_metadata() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(200, session_body("pending"));
        let user = user(&transport);

        let mut metadata = Metadata::new();
        metadata.insert("channel".to_string(), json!("web"));
        user.create_session(Some(metadata)).await.unwrap();

        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"metadata": {"channel": "web"}}))
        );
    }

    #[tokio::test]
    async fn test_get_session_wraps_snapshot() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(200, session_body("processing"));
        let user = user(&transport);

        let session = user.get_session("sess_1").await.unwrap();
        assert_eq!(session.status(), SessionStatus::Processing);
        assert_eq!(
            transport.requests()[0].path,
            "/api/v1/users/alice/sessions/sess_1"
        );
    }

    #[tokio::test]
    async fn test_get_session_404_disambiguation() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(404, json!({"detail": "Session not found"}));
        let user = user(&transport);

        let err = user.get_session("missing").await.unwrap_err();
        assert!(matches!(err, RecallrAiError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_sessions_paginates() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            200,
            json!({
                "sessions": [session_body("pending")],
                "total": 1,
                "has_more": false
            }),
        );
        let user = user(&transport);

        let page = user.list_sessions(0, 25).await.unwrap();
        assert_eq!(page.sessions.len(), 1);
        assert_eq!(page.total, 1);
        assert_eq!(
            transport.requests()[0].query,
            vec![
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "25".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_merge_conflict_wraps_snapshot() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            200,
            json!({
                "conflict_id": "mc_1",
                "status": "pending",
                "new_memory_content": "Lives in Helsinki",
                "created_at": "2026-08-27T10:00:00Z"
            }),
        );
        let user = user(&transport);

        let conflict = user.get_merge_conflict("mc_1").await.unwrap();
        assert_eq!(conflict.conflict_id(), "mc_1");
        assert_eq!(
            transport.requests()[0].path,
            "/api/v1/users/alice/merge-conflicts/mc_1"
        );
    }

    #[tokio::test]
    async fn test_refresh_and_update_replace_snapshot() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            200,
            json!({
                "user_id": "alice",
                "metadata": {"plan": "enterprise"},
                "created_at": "2026-08-27T09:00:00Z",
                "last_active_at": "2026-08-27T12:00:00Z"
            }),
        );
        let mut user = user(&transport);

        let mut new_metadata = Metadata::new();
        new_metadata.insert("plan".to_string(), json!("enterprise"));
        user.update(new_metadata).await.unwrap();

        assert_eq!(user.metadata()["plan"], json!("enterprise"));
        assert_eq!(transport.requests()[0].method, Method::Put);
    }

    #[tokio::test]
    async fn test_delete_issues_delete() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(200, Value::Null);
        let user = user(&transport);

        user.delete().await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(requests[0].path, "/api/v1/users/alice");
    }

    #[tokio::test]
    async fn test_list_memories_with_category_filter() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            200,
            json!({
                "memories": [{
                    "memory_id": "mem_1",
                    "content": "Prefers window seats",
                    "categories": ["travel"],
                    "created_at": "2026-08-27T10:00:00Z"
                }],
                "total": 1,
                "has_more": false
            }),
        );
        let user = user(&transport);

        let filter = vec!["travel".to_string()];
        let page = user.list_memories(0, 10, Some(&filter)).await.unwrap();
        assert_eq!(page.memories.len(), 1);

        let query = &transport.requests()[0].query;
        assert!(query.contains(&("categories".to_string(), "travel".to_string())));
    }

    #[tokio::test]
    async fn test_list_memories_invalid_categories() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            422,
            json!({"detail": "Unknown memory categories: [\"nope\"]"}),
        );
        let user = user(&transport);

        let filter = vec!["nope".to_string()];
        let err = user.list_memories(0, 10, Some(&filter)).await.unwrap_err();
        assert!(matches!(err, RecallrAiError::InvalidCategories { .. }));
    }
}
