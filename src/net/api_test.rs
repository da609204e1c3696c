use super::*;
use crate::net::transport::CONTENT_TYPE_JSON;
use crate::test_helpers::{harness, user_json};
use crate::util::token_store::TokenStore;

fn credentials() -> LoginRequest {
    LoginRequest { username: "ops".to_owned(), password: "hunter22".to_owned() }
}

#[tokio::test]
async fn login_posts_form_without_bearer() {
    let h = harness(Some("stale"), "/login");
    h.transport.respond(200, serde_json::json!({"access_token": "abc123", "token_type": "bearer"}));

    let token = h.auth.api().login(&credentials()).await.expect("login");

    assert_eq!(token.access_token, "abc123");
    let request = &h.transport.requests()[0];
    assert_eq!(request.url, "/api/v1/auth/login");
    assert_eq!(request.header("Authorization"), None);
    assert_eq!(request.body, Body::Form(credentials().form_fields()));
}

#[tokio::test]
async fn register_surfaces_backend_detail() {
    let h = harness(None, "/register");
    h.transport.respond(400, serde_json::json!({"detail": "Username already registered"}));
    let account =
        RegisterRequest { username: "ops".to_owned(), email: "ops@example.com".to_owned(), password: "hunter22".to_owned() };

    let err = h.auth.api().register(&account).await.expect_err("taken");

    assert_eq!(err.message(), "Username already registered");
    let request = &h.transport.requests()[0];
    assert_eq!(request.url, "/api/v1/users");
    assert_eq!(request.header("Content-Type"), Some(CONTENT_TYPE_JSON));
}

#[tokio::test]
async fn current_user_uses_explicit_bearer() {
    let h = harness(None, "/");
    h.transport.respond(200, user_json());

    let user = h.auth.api().current_user(&RequestOptions::with_bearer("abc123")).await.expect("user");

    assert_eq!(user.id, 1);
    assert_eq!(h.transport.requests()[0].header("Authorization"), Some("Bearer abc123"));
}

#[tokio::test]
async fn update_profile_sends_only_changed_fields() {
    let h = harness(Some("abc123"), "/profile");
    h.transport.respond(200, user_json());
    let update = UserUpdate { full_name: Some("Ops Team".to_owned()), ..UserUpdate::default() };

    h.auth.api().update_profile(&update).await.expect("update");

    let request = &h.transport.requests()[0];
    assert_eq!(request.method, Method::Put);
    assert_eq!(request.body, Body::Json(serde_json::json!({"full_name": "Ops Team"})));
}

#[tokio::test]
async fn update_password_returns_acknowledgement() {
    let h = harness(Some("abc123"), "/profile");
    h.transport.respond(200, serde_json::json!({"msg": "Password updated successfully"}));
    let update = PasswordUpdate { current_password: "old-pass".to_owned(), new_password: "new-pass".to_owned() };

    let msg = h.auth.api().update_password(&update).await.expect("password");

    assert_eq!(msg.msg, "Password updated successfully");
    assert_eq!(h.transport.requests()[0].url, "/api/v1/users/me/password");
}

#[tokio::test]
async fn user_stats_expiry_ends_session() {
    let h = harness(Some("expired-token"), "/statistics");
    h.transport.respond(401, serde_json::json!({}));

    let err = h.auth.api().user_stats().await.expect_err("expired");

    assert_eq!(err.status(), Some(401));
    assert_eq!(h.tokens.get(), None);
    assert_eq!(h.navigator.navigations(), vec!["/login".to_owned()]);
}
