use std::sync::Arc;

use chrono::Duration;
use quiz_core::time::fixed_clock;
use serde_json::json;
use services::{
    ApiClient, ApiError, ApiRequest, AuthError, Method, ScriptedReply, ScriptedTransport,
    SessionStore,
};
use storage::{CredentialRepository, InMemoryCredentialRepository};

fn setup(transport: &ScriptedTransport) -> (ApiClient, SessionStore, InMemoryCredentialRepository) {
    let repo = InMemoryCredentialRepository::new();
    let store = SessionStore::new(fixed_clock(), Arc::new(repo.clone()));
    (ApiClient::new(Arc::new(transport.clone())), store, repo)
}

fn login_ok() -> ScriptedReply {
    ScriptedReply::ok(json!({"success": true, "data": "jwt-123", "message": "welcome"}))
}

#[tokio::test]
async fn login_caches_and_persists_token() {
    let transport = ScriptedTransport::new().on(Method::POST, "/users/login", login_ok());
    let (api, mut store, repo) = setup(&transport);

    let ack = store.login(&api, "alice", "pw").await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("welcome"));
    assert!(store.is_authenticated());
    assert_eq!(store.bearer(), Some("jwt-123"));

    let persisted = repo.load().await.unwrap().unwrap();
    assert_eq!(persisted.token, "jwt-123");

    let sent = transport.requests_to("/users/login");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].bearer.is_none());
    assert_eq!(sent[0].body, Some(json!({"id": "alice", "password": "pw"})));
}

#[tokio::test]
async fn rejected_login_reports_service_message() {
    let transport = ScriptedTransport::new().on(
        Method::POST,
        "/users/login",
        ScriptedReply::Json {
            status: 401,
            body: json!({"success": false, "message": "bad password"}),
        },
    );
    let (api, mut store, _) = setup(&transport);

    let err = store.login(&api, "alice", "nope").await.unwrap_err();
    assert!(matches!(&err, AuthError::Rejected { message } if message == "bad password"));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn rejected_login_without_message_gets_default() {
    let transport = ScriptedTransport::new().on(
        Method::POST,
        "/users/login",
        ScriptedReply::ok(json!({"success": false})),
    );
    let (api, mut store, _) = setup(&transport);

    let err = store.login(&api, "alice", "nope").await.unwrap_err();
    assert!(matches!(err, AuthError::Rejected { ref message } if !message.is_empty()));
}

#[tokio::test]
async fn login_transport_failure_is_not_retried() {
    let transport =
        ScriptedTransport::new().on(Method::POST, "/users/login", ScriptedReply::Unavailable);
    let (api, mut store, _) = setup(&transport);

    let err = store.login(&api, "alice", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::Api(ApiError::Transport(_))));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(err.user_message(), "An error occurred while logging in.");
}

#[tokio::test]
async fn session_expires_after_thirty_minutes() {
    let transport = ScriptedTransport::new().on(Method::POST, "/users/login", login_ok());
    let (api, mut store, _) = setup(&transport);
    store.login(&api, "alice", "pw").await.unwrap();

    store.advance_clock(Duration::minutes(29) + Duration::seconds(59));
    assert!(store.is_authenticated());
    store.advance_clock(Duration::seconds(1));
    assert!(!store.is_authenticated());
    assert!(store.bearer().is_none());
}

#[tokio::test]
async fn logout_clears_memory_and_storage() {
    let transport = ScriptedTransport::new().on(Method::POST, "/users/login", login_ok());
    let (api, mut store, repo) = setup(&transport);
    store.login(&api, "alice", "pw").await.unwrap();

    store.logout().await;
    assert!(!store.is_authenticated());
    assert!(repo.load().await.unwrap().is_none());

    // Logging out twice is harmless.
    store.logout().await;
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn protected_calls_carry_bearer_only_while_live() {
    let transport = ScriptedTransport::new()
        .on(Method::POST, "/users/login", login_ok())
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::ok(json!([])));
    let (api, mut store, _) = setup(&transport);

    api.call(&store, ApiRequest::get(["quiz", "checkResult"]))
        .await
        .unwrap();
    store.login(&api, "alice", "pw").await.unwrap();
    api.call(&store, ApiRequest::get(["quiz", "checkResult"]))
        .await
        .unwrap();
    store.advance_clock(Duration::minutes(30));
    api.call(&store, ApiRequest::get(["quiz", "checkResult"]))
        .await
        .unwrap();

    let bearers: Vec<Option<String>> = transport
        .requests_to("/quiz/checkResult")
        .into_iter()
        .map(|request| request.bearer)
        .collect();
    assert_eq!(bearers, vec![None, Some("jwt-123".to_string()), None]);
}

#[tokio::test]
async fn non_success_status_becomes_status_error() {
    let transport = ScriptedTransport::new()
        .on(Method::GET, "/users/getUserinfo", ScriptedReply::status(403))
        .on(Method::GET, "/quiz/checkResult", ScriptedReply::status(500));
    let (api, store, _) = setup(&transport);

    let err = api
        .call(&store, ApiRequest::get(["users", "getUserinfo"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 403 }));
    assert!(err.is_auth_failure());

    let err = api
        .call(&store, ApiRequest::get(["quiz", "checkResult"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500 }));
    assert!(!err.is_auth_failure());

    let err = api
        .call(&store, ApiRequest::get(["unscripted"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404 }));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let transport = ScriptedTransport::new().on(
        Method::GET,
        "/quiz/checkResult",
        ScriptedReply::Text {
            status: 200,
            body: "<html>".to_string(),
        },
    );
    let (api, store, _) = setup(&transport);

    let err = api
        .call(&store, ApiRequest::get(["quiz", "checkResult"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
