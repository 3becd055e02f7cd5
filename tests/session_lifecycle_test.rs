//! Session lifecycle integration tests
//!
//! Exercises the full client stack (client -> HTTP transport -> classifier)
//! against a `wiremock` mock server: credential headers, the
//! create/add-message/context/process/refresh flow, server-authoritative
//! state rejection, and timeout surfacing.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use recallrai::types::{ContextOptions, MessageRole, SessionStatus};
use recallrai::{ClientConfig, RecallrAiClient, RecallrAiError};

fn make_client(base_url: &str) -> RecallrAiClient {
    RecallrAiClient::new(
        ClientConfig::new("test-key", "test-project")
            .with_base_url(base_url)
            .with_timeout(Duration::from_secs(5)),
    )
    .expect("client should build")
}

fn user_body(user_id: &str) -> serde_json::Value {
    json!({
        "user_id": user_id,
        "metadata": {},
        "created_at": "2026-08-27T09:00:00Z"
    })
}

fn session_body(session_id: &str, status: &str) -> serde_json::Value {
    json!({
        "session_id": session_id,
        "status": status,
        "created_at": "2026-08-27T10:00:00Z",
        "metadata": {}
    })
}

/// Every request carries the `X-Api-Key` and `X-Project-Id` headers.
#[tokio::test]
async fn test_credential_headers_sent_on_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .and(header("X-Api-Key", "test-key"))
        .and(header("X-Project-Id", "test-project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .expect(1)
        .mount(&server)
        .await;

    let client = make_client(&server.uri());
    client.get_user("alice").await.expect("get_user");

    server.verify().await;
}

/// The full happy path: create a user, open a session, append messages,
/// fetch context, trigger processing, then observe the server-side
/// transition via refresh.
#[tokio::test]
async fn test_full_session_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users"))
        .and(body_json(json!({"user_id": "alice", "metadata": {}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/alice/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("sess_1", "pending")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/alice/sessions/sess_1/add-message"))
        .and(body_json(json!({"message": "I moved to Helsinki", "role": "user"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/sessions/sess_1/context"))
        .and(query_param("recall_strategy", "balanced"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "context": "The user lives in Helsinki.",
            "metadata": {"memories_used": [], "sessions_covered": ["sess_0"]}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/alice/sessions/sess_1/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "accepted"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/sessions/sess_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("sess_1", "processed")))
        .mount(&server)
        .await;

    let client = make_client(&server.uri());

    let user = client.create_user("alice", None).await.expect("create_user");
    let mut session = user.create_session(None).await.expect("create_session");
    assert_eq!(session.status(), SessionStatus::Pending);

    session
        .add_message(MessageRole::User, "I moved to Helsinki")
        .await
        .expect("add_message");

    let context = session
        .get_context(
            &ContextOptions::default().recall_strategy(recallrai::types::RecallStrategy::Balanced),
        )
        .await
        .expect("get_context");
    assert_eq!(context.context, "The user lives in Helsinki.");
    let metadata = context.metadata.expect("context metadata");
    assert_eq!(metadata.sessions_covered.unwrap(), vec!["sess_0"]);

    session.process().await.expect("process");
    // Processing is observed via refresh, never assumed locally.
    assert_eq!(session.status(), SessionStatus::Pending);

    session.refresh().await.expect("refresh");
    assert_eq!(session.status(), SessionStatus::Processed);

    server.verify().await;
}

/// A session auto-processed out-of-band: the local cache still says
/// `pending`, so the guard passes, but the server's 400 must surface as
/// `InvalidSessionState`.
#[tokio::test]
async fn test_server_rejects_add_message_despite_fresh_looking_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/sessions/sess_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("sess_1", "pending")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/alice/sessions/sess_1/add-message"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Session is already processed"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .mount(&server)
        .await;

    let client = make_client(&server.uri());
    let user = client.get_user("alice").await.expect("get_user");
    let session = user.get_session("sess_1").await.expect("get_session");

    let err = session
        .add_message(MessageRole::Assistant, "reply")
        .await
        .expect_err("server rejection must surface");
    assert!(matches!(err, RecallrAiError::InvalidSessionState { .. }));
}

/// A response slower than the configured timeout surfaces as `Timeout` and
/// the request is abandoned client-side.
#[tokio::test]
async fn test_slow_response_surfaces_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_body("alice"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = RecallrAiClient::new(
        ClientConfig::new("test-key", "test-project")
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(100)),
    )
    .expect("client should build");

    let err = client.get_user("alice").await.expect_err("must time out");
    assert!(matches!(err, RecallrAiError::Timeout { .. }));
    assert!(err.is_retryable());
}

/// Message pages come back in server order; the client never reorders.
#[tokio::test]
async fn test_get_messages_preserves_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body("alice")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/sessions/sess_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body("sess_1", "pending")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/alice/sessions/sess_1/messages"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "messages": [
                {"role": "assistant", "content": "second", "timestamp": "2026-08-27T10:00:01Z"},
                {"role": "user", "content": "first", "timestamp": "2026-08-27T10:00:00Z"}
            ],
            "total": 2,
            "has_more": false
        })))
        .mount(&server)
        .await;

    let client = make_client(&server.uri());
    let user = client.get_user("alice").await.expect("get_user");
    let session = user.get_session("sess_1").await.expect("get_session");

    let page = session.get_messages(0, 20).await.expect("get_messages");
    assert_eq!(page.messages[0].content, "second");
    assert_eq!(page.messages[1].content, "first");
}
