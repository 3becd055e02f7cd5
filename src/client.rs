//! RecallrAI client entry point
//!
//! [`RecallrAiClient`] owns the shared transport and exposes the user CRUD
//! surface. All other handles ([`crate::Session`], [`crate::MergeConflict`])
//! are reached through a [`User`].

use std::sync::Arc;

use serde_json::json;

use crate::classifier::{classify, CallContext, Operation, ResourceKind};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::http::HttpTransport;
use crate::transport::{Method, Transport};
use crate::types::{decode, page_query, Metadata, UserData, UserList};
use crate::user::User;

/// Client for the RecallrAI contextual memory service
///
/// # Examples
///
/// ```no_run
/// use recallrai::{ClientConfig, RecallrAiClient};
/// use recallrai::types::MessageRole;
///
/// # async fn example() -> recallrai::Result<()> {
/// let client = RecallrAiClient::new(ClientConfig::new("rai_...", "project_..."))?;
///
/// let user = client.create_user("alice", None).await?;
/// let session = user.create_session(None).await?;
/// session.add_message(MessageRole::User, "I moved to Helsinki").await?;
/// session.process().await?;
/// # Ok(())
/// # }
/// ```
pub struct RecallrAiClient {
    transport: Arc<dyn Transport>,
}

impl RecallrAiClient {
    /// Build a client over the real HTTP transport
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the configuration is invalid and
    /// `Connection` when the HTTP client fails to initialize.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self {
            transport: Arc::new(transport),
        })
    }

    /// Build a client over an arbitrary transport
    ///
    /// This is the seam tests use to substitute
    /// [`crate::transport::fake::FakeTransport`].
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn ctx<'a>(&self, op: Operation, user_id: &'a str) -> CallContext<'a> {
        CallContext::new(ResourceKind::User, op).for_user(user_id)
    }

    /// Create a user
    ///
    /// # Errors
    ///
    /// `UserAlreadyExists` when the ID is taken, `Decode`, or a
    /// transport/server kind.
    pub async fn create_user(
        &self,
        user_id: &str,
        metadata: Option<Metadata>,
    ) -> Result<User> {
        let body = json!({
            "user_id": user_id,
            "metadata": metadata.unwrap_or_default(),
        });
        let response = self
            .transport
            .send(Method::Post, "/api/v1/users", &[], Some(body))
            .await?;
        classify(&self.ctx(Operation::CreateUser, user_id), &response)?;
        let data: UserData = decode(response.body)?;
        Ok(User::new(Arc::clone(&self.transport), data))
    }

    /// Fetch an existing user
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `Decode`, or a transport/server kind.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        let response = self
            .transport
            .send(
                Method::Get,
                &format!("/api/v1/users/{}", user_id),
                &[],
                None,
            )
            .await?;
        classify(&self.ctx(Operation::Other, user_id), &response)?;
        let data: UserData = decode(response.body)?;
        Ok(User::new(Arc::clone(&self.transport), data))
    }

    /// List users, paginated
    ///
    /// # Errors
    ///
    /// `Decode` or a transport/server kind.
    pub async fn list_users(&self, offset: u32, limit: u32) -> Result<UserList> {
        let response = self
            .transport
            .send(
                Method::Get,
                "/api/v1/users",
                &page_query(offset, limit),
                None,
            )
            .await?;
        classify(
            &CallContext::new(ResourceKind::User, Operation::Other),
            &response,
        )?;
        decode(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecallrAiError;
    use crate::transport::fake::FakeTransport;
    use serde_json::json;

    fn client(transport: &Arc<FakeTransport>) -> RecallrAiClient {
        RecallrAiClient::with_transport(Arc::clone(transport) as Arc<dyn Transport>)
    }

    fn user_body(user_id: &str) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "metadata": {},
            "created_at": "2026-08-27T09:00:00Z"
        })
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = RecallrAiClient::new(ClientConfig::new("", "project"));
        assert!(matches!(result, Err(RecallrAiError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_user_posts_id_and_metadata() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(200, user_body("alice"));
        let client = client(&transport);

        let user = client.create_user("alice", None).await.unwrap();
        assert_eq!(user.user_id(), "alice");

        let requests = transport.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/api/v1/users");
        assert_eq!(
            requests[0].body,
            Some(json!({"user_id": "alice", "metadata": {}}))
        );
    }

    #[tokio::test]
    async fn test_create_user_conflict_maps_to_already_exists() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(409, json!({"detail": "User alice already exists"}));
        let client = client(&transport);

        let err = client.create_user("alice", None).await.unwrap_err();
        assert!(matches!(err, RecallrAiError::UserAlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(404, json!({"detail": "User bob not found"}));
        let client = client(&transport);

        let err = client.get_user("bob").await.unwrap_err();
        assert!(matches!(err, RecallrAiError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_users_paginates() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(
            200,
            json!({
                "users": [user_body("alice"), user_body("bob")],
                "total": 2,
                "has_more": false
            }),
        );
        let client = client(&transport);

        let page = client.list_users(0, 100).await.unwrap();
        assert_eq!(page.users.len(), 2);
        assert_eq!(
            transport.requests()[0].query,
            vec![
                ("offset".to_string(), "0".to_string()),
                ("limit".to_string(), "100".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_authentication_error_surfaces() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_response(401, json!({"detail": "invalid api key"}));
        let client = client(&transport);

        let err = client.get_user("alice").await.unwrap_err();
        assert!(matches!(err, RecallrAiError::Authentication { .. }));
    }
}
