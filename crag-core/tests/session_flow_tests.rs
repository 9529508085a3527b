//! Login, guarded pages and collection toggles end to end over HTTP

mod common;

use common::{climb_json, MockServer};
use crag_core::auth;
use crag_core::collections::CollectionKind;
use crag_core::config::ApiConfig;
use crag_core::forms::LoginForm;
use crag_core::guard::{AuthGate, Guarded};
use crag_core::pages::ClimbDetail;
use crag_core::routes::Route;
use crag_core::{ApiClient, CatalogApi, FileSessionStore, MemorySessionStore, SessionStore};
use std::sync::Arc;

fn backend(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig { base_url: server.url(), ..ApiConfig::default() }).unwrap()
}

fn script_login(server: &MockServer) {
    server.respond(
        "POST",
        "/token",
        200,
        r#"{"access_token":"tok-amina","token_type":"bearer","expires_in":600}"#,
    );
    server.respond("GET", "/users/me", 200, r#"{"id":3,"username":"amina","email":"a@b.org"}"#);
}

#[tokio::test]
async fn test_login_persists_session_for_next_invocation() {
    let server = MockServer::start().await;
    script_login(&server);
    let api = backend(&server);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileSessionStore::new(&path);

    let session = auth::login(&api, &store, &LoginForm::new("amina", "pw"), 86_400).await.unwrap();
    assert_eq!(session.user_id, 3);
    assert!(session.remaining() <= chrono::Duration::seconds(600));

    // a fresh store on the same file sees the session
    let gate = AuthGate::new(Arc::new(FileSessionStore::new(&path)));
    let page = gate.run(|s| async move { Ok(s.username) }).await.unwrap();
    assert_eq!(page, Guarded::Rendered("amina".to_string()));

    let me = server.requests_to("/users/me");
    assert_eq!(me[0].authorization.as_deref(), Some("Bearer tok-amina"));
}

#[tokio::test]
async fn test_absurd_token_lifetime_falls_back_to_max_age() {
    let server = MockServer::start().await;
    server.respond(
        "POST",
        "/token",
        200,
        r#"{"access_token":"tok-amina","token_type":"bearer","expires_in":10000000000000}"#,
    );
    server.respond("GET", "/users/me", 200, r#"{"id":3,"username":"amina"}"#);
    let api = backend(&server);
    let store = MemorySessionStore::new();

    let session = auth::login(&api, &store, &LoginForm::new("amina", "pw"), 3600).await.unwrap();

    assert!(!session.is_expired());
    assert!(session.remaining() <= chrono::Duration::seconds(3600));
    assert!(session.remaining() > chrono::Duration::seconds(3500));
}

#[tokio::test]
async fn test_guarded_page_without_login_never_hits_backend() {
    let server = MockServer::start().await;
    let api = backend(&server);
    let dir = tempfile::tempdir().unwrap();
    let gate = AuthGate::new(Arc::new(FileSessionStore::new(dir.path().join("none.json"))));

    let outcome = gate
        .run(|session| {
            let api = &api;
            async move { api.collection(&session, CollectionKind::Ticklist).await }
        })
        .await
        .unwrap();

    assert_eq!(outcome, Guarded::Redirected { location: Route::Login.path() });
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_tick_then_untick_from_detail_page() {
    let server = MockServer::start().await;
    script_login(&server);
    server.respond("GET", "/climbs/7", 200, &climb_json(7, "Lake View Arete", "V4").to_string());
    server.respond("GET", "/climbs/7/logs", 200, "[]");
    server.respond("GET", "/users/", 200, r#"[{"id":3,"username":"amina"}]"#);
    server.respond("GET", "/ticklist/", 200, "[]");
    server.respond("GET", "/hitlist/", 200, "[]");
    server.respond("POST", "/ticklist/add", 200, "{}");
    server.respond("POST", "/ticklist/remove", 200, "{}");
    server.respond("POST", "/logs/remove", 200, "{}");

    let api = backend(&server);
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    let session = auth::login(&api, &store, &LoginForm::new("amina", "pw"), 3600).await.unwrap();

    let mut detail = ClimbDetail::load(&api, 7, Some(&session)).await.unwrap();
    assert_eq!(detail.first_ascensionist_href().as_deref(), Some("/profile/3"));
    assert!(!detail.ticklist.value().unwrap().is_member());

    let added = detail.toggle(&api, &session, CollectionKind::Ticklist).await.unwrap();
    assert_eq!(added.redirect, Some(Route::Log(7)));
    assert!(server.requests_to("/logs/remove").is_empty());

    let removed = detail.toggle(&api, &session, CollectionKind::Ticklist).await.unwrap();
    assert_eq!(removed.log_cleanup_error, None);
    assert_eq!(server.requests_to("/ticklist/add").len(), 1);
    assert_eq!(server.requests_to("/ticklist/remove").len(), 1);
    assert_eq!(server.requests_to("/logs/remove")[0].body_json(), serde_json::json!({"climb_id": 7}));

    assert!(auth::logout(&store).await.unwrap());
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_add_leaves_membership_absent() {
    let server = MockServer::start().await;
    script_login(&server);
    server.respond("GET", "/climbs/7", 200, &climb_json(7, "Lake View Arete", "V4").to_string());
    server.respond("GET", "/hitlist/", 200, "[]");
    server.respond("GET", "/ticklist/", 200, "[]");
    server.respond("POST", "/hitlist/add", 500, r#"{"detail":"boom"}"#);

    let api = backend(&server);
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    let session = auth::login(&api, &store, &LoginForm::new("amina", "pw"), 3600).await.unwrap();

    let mut detail = ClimbDetail::load(&api, 7, Some(&session)).await.unwrap();
    let err = detail.toggle(&api, &session, CollectionKind::Hitlist).await.unwrap_err();

    assert!(err.to_string().contains("boom"));
    assert!(!detail.hitlist.value().unwrap().is_member());
    // unscripted logs endpoint surfaces as a section error, not a page error
    assert!(detail.logs.error().is_some());
}
