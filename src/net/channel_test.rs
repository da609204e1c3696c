use std::sync::Arc;

use super::*;
use crate::net::types::User;
use crate::test_helpers::{FakeTransport, harness, user_json};
use crate::util::token_store::TokenStore;

fn anonymous_channel(transport: &Arc<FakeTransport>) -> RequestChannel {
    RequestChannel::anonymous(Arc::new(ChannelConfig::default()), transport.clone())
}

// =============================================================
// Request stage
// =============================================================

#[tokio::test]
async fn stored_token_is_attached_as_bearer() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(200, user_json());

    let user: User = h.auth.api().channel().get("/users/me").await.expect("request");

    assert_eq!(user.username, "ops");
    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "/api/v1/users/me");
    assert_eq!(requests[0].header("authorization"), Some("Bearer abc123"));
    assert_eq!(requests[0].header("accept"), Some("application/json"));
}

#[tokio::test]
async fn token_is_read_at_dispatch_time() {
    let h = harness(None, "/");
    h.transport.respond(200, user_json());
    h.transport.respond(200, user_json());
    let channel = h.auth.api().channel();

    let _: User = channel.get("/users/me").await.expect("first");
    h.tokens.set("later");
    let _: User = channel.get("/users/me").await.expect("second");

    let requests = h.transport.requests();
    assert_eq!(requests[0].header("Authorization"), None);
    assert_eq!(requests[1].header("Authorization"), Some("Bearer later"));
}

#[tokio::test]
async fn explicit_bearer_overrides_store() {
    let h = harness(Some("stored"), "/");
    h.transport.respond(200, user_json());

    let _: User = h
        .auth
        .api()
        .channel()
        .request(Method::Get, "/users/me", Body::Empty, &RequestOptions::with_bearer("explicit"))
        .await
        .expect("request");

    assert_eq!(h.transport.requests()[0].header("Authorization"), Some("Bearer explicit"));
}

#[tokio::test]
async fn empty_stored_token_sends_no_header() {
    let h = harness(Some(""), "/");
    h.transport.respond(200, user_json());

    let _: User = h.auth.api().channel().get("/users/me").await.expect("request");

    assert_eq!(h.transport.requests()[0].header("Authorization"), None);
}

#[tokio::test]
async fn form_body_carries_form_content_type() {
    let transport = FakeTransport::new();
    transport.respond(200, serde_json::json!({"access_token": "t"}));
    let body = Body::Form(vec![("username".to_owned(), "ops".to_owned())]);

    let _: serde_json::Value = anonymous_channel(&transport).post("/auth/login", body).await.expect("request");

    let request = &transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.header("Content-Type"), Some("application/x-www-form-urlencoded"));
}

// =============================================================
// Anonymous channel
// =============================================================

#[tokio::test]
async fn anonymous_channel_never_sends_stored_token() {
    let h = harness(Some("stale"), "/register");
    let channel = anonymous_channel(&h.transport);
    h.transport.respond(200, serde_json::json!({}));

    channel.execute(Method::Post, "/users", Body::Empty, &RequestOptions::default()).await.expect("request");

    assert_eq!(h.transport.requests()[0].header("Authorization"), None);
    assert_eq!(channel.kind(), ChannelKind::Anonymous);
}

#[tokio::test]
async fn anonymous_401_has_no_side_effects() {
    let h = harness(Some("stale"), "/login");
    let channel = anonymous_channel(&h.transport);
    h.transport.respond(401, serde_json::json!({"detail": "Incorrect username or password"}));

    let err = channel.execute(Method::Post, "/auth/login", Body::Empty, &RequestOptions::default()).await;

    assert_eq!(err, Err(ApiError::Unauthorized { detail: Some("Incorrect username or password".to_owned()) }));
    assert_eq!(h.tokens.get().as_deref(), Some("stale"));
    assert!(h.navigator.navigations().is_empty());
}

// =============================================================
// 401 response stage
// =============================================================

#[tokio::test]
async fn unauthorized_clears_token_session_and_redirects_once() {
    let h = harness(Some("expired-token"), "/projects");
    h.auth.session().set_token("expired-token");
    h.transport.respond(401, serde_json::json!({"detail": "Could not validate credentials"}));

    let result: Result<User, ApiError> = h.auth.api().channel().get("/users/me").await;

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(h.tokens.get(), None);
    assert!(!h.auth.session().is_authenticated());
    assert_eq!(h.navigator.navigations(), vec![LOGIN_PATH.to_owned()]);
}

#[tokio::test]
async fn unauthorized_on_login_page_does_not_navigate() {
    let h = harness(Some("expired-token"), "/login");
    h.transport.respond(401, serde_json::json!({}));

    let result: Result<User, ApiError> = h.auth.api().channel().get("/users/me").await;

    assert!(result.is_err());
    assert_eq!(h.tokens.get(), None);
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn suppressed_redirect_still_cleans_up() {
    let h = harness(Some("expired-token"), "/");
    h.transport.respond(401, serde_json::json!({}));
    let options = RequestOptions::default().without_redirect();

    let result: Result<User, ApiError> =
        h.auth.api().channel().request(Method::Get, "/users/me", Body::Empty, &options).await;

    assert!(result.is_err());
    assert_eq!(h.tokens.get(), None);
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn concurrent_unauthorized_responses_navigate_once() {
    let h = harness(Some("expired-token"), "/tasks");
    h.transport.respond(401, serde_json::json!({}));
    h.transport.respond(401, serde_json::json!({}));
    let channel = h.auth.api().channel();

    let (first, second) = futures::join!(channel.get::<User>("/users/me"), channel.get::<User>("/users/me/stats"));

    assert!(first.is_err());
    assert!(second.is_err());
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.navigator.navigations(), vec![LOGIN_PATH.to_owned()]);
}

// =============================================================
// Other failures
// =============================================================

#[tokio::test]
async fn timeout_keeps_token() {
    let h = harness(Some("abc123"), "/");
    h.transport.fail(ApiError::Timeout { millis: 10_000 });

    let result: Result<User, ApiError> = h.auth.api().channel().get("/users/me").await;

    assert_eq!(result, Err(ApiError::Timeout { millis: 10_000 }));
    assert_eq!(h.tokens.get().as_deref(), Some("abc123"));
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(500, serde_json::json!({"detail": "database unavailable"}));

    let result: Result<User, ApiError> = h.auth.api().channel().get("/users/me").await;

    assert_eq!(result, Err(ApiError::Status { status: 500, detail: "database unavailable".to_owned() }));
    assert_eq!(h.tokens.get().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond_raw(200, "<html>");

    let result: Result<User, ApiError> = h.auth.api().channel().get("/users/me").await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

// =============================================================
// Generations
// =============================================================

#[tokio::test]
async fn response_after_logout_is_superseded() {
    let h = harness(Some("abc123"), "/");
    h.auth.session().set_token("abc123");
    h.transport.respond(200, user_json());
    let release = h.transport.hold_next();
    let channel = h.auth.api().channel();

    let (result, ()) = futures::join!(channel.get::<User>("/users/me"), async {
        h.auth.logout();
        release.send(()).expect("release");
    });

    assert_eq!(result, Err(ApiError::Superseded));
}

#[tokio::test]
async fn stale_unauthorized_leaves_new_session_alone() {
    let h = harness(Some("old"), "/projects");
    h.transport.respond(401, serde_json::json!({}));
    let release = h.transport.hold_next();
    let channel = h.auth.api().channel();

    let (result, ()) = futures::join!(channel.get::<User>("/users/me"), async {
        h.auth.logout();
        h.tokens.set("fresh");
        release.send(()).expect("release");
    });

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert_eq!(h.tokens.get().as_deref(), Some("fresh"));
    assert!(h.navigator.navigations().is_empty());
}
