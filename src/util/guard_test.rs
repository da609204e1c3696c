use super::*;
use crate::net::error::ApiError;
use crate::test_helpers::{harness, user_json};
use crate::util::token_store::TokenStore;

// =============================================================
// decide
// =============================================================

#[test]
fn authenticated_route_redirects_guests_to_login() {
    assert_eq!(decide(AccessRequirement::Authenticated, false), GuardDecision::Redirect("/login"));
}

#[test]
fn authenticated_route_allows_signed_in() {
    assert_eq!(decide(AccessRequirement::Authenticated, true), GuardDecision::Allow);
}

#[test]
fn guest_route_redirects_signed_in_home() {
    assert_eq!(decide(AccessRequirement::Guest, true), GuardDecision::Redirect("/"));
}

#[test]
fn guest_route_allows_guests() {
    assert_eq!(decide(AccessRequirement::Guest, false), GuardDecision::Allow);
}

#[test]
fn open_route_always_allows() {
    assert_eq!(decide(AccessRequirement::Open, false), GuardDecision::Allow);
    assert_eq!(decide(AccessRequirement::Open, true), GuardDecision::Allow);
}

// =============================================================
// NavigationGuard
// =============================================================

#[tokio::test]
async fn first_check_restores_valid_session() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(200, user_json());
    let guard = NavigationGuard::new(h.auth.clone());
    assert_eq!(guard.phase(), GuardPhase::Uninitialized);

    assert_eq!(guard.check_path("/").await, GuardDecision::Allow);

    assert_eq!(guard.phase(), GuardPhase::Ready);
    assert!(h.auth.is_authenticated());
    assert_eq!(guard.check_path("/login").await, GuardDecision::Redirect("/"));
    assert_eq!(h.transport.requests().len(), 1);
}

#[tokio::test]
async fn expired_token_redirects_to_login() {
    let h = harness(Some("expired-token"), "/projects");
    h.transport.respond(401, serde_json::json!({"detail": "Could not validate credentials"}));
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check_path("/projects").await, GuardDecision::Redirect("/login"));

    assert_eq!(h.tokens.get(), None);
    assert!(!h.auth.is_authenticated());
    assert!(h.navigator.navigations().is_empty());
}

#[tokio::test]
async fn no_token_allows_login_without_request() {
    let h = harness(None, "/login");
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check(AccessRequirement::Guest).await, GuardDecision::Allow);
    assert_eq!(guard.check(AccessRequirement::Authenticated).await, GuardDecision::Redirect("/login"));

    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn network_failure_during_restore_redirects_to_login() {
    let h = harness(Some("abc123"), "/");
    h.transport.fail(ApiError::Network("connection refused".to_owned()));
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check_path("/").await, GuardDecision::Redirect("/login"));

    assert_eq!(guard.phase(), GuardPhase::Ready);
    assert_eq!(h.tokens.get(), None);
    assert!(!h.auth.is_authenticated());
}

#[tokio::test]
async fn server_error_during_restore_redirects_to_login() {
    let h = harness(Some("expired-token"), "/");
    h.transport.respond(500, serde_json::json!({"detail": "database unavailable"}));
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check_path("/").await, GuardDecision::Redirect("/login"));
    assert_eq!(h.tokens.get(), None);
}

#[tokio::test]
async fn timeout_during_restore_still_allows_guest_routes() {
    let h = harness(Some("abc123"), "/login");
    h.transport.fail(ApiError::Timeout { millis: 10_000 });
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check_path("/login").await, GuardDecision::Allow);
}

#[tokio::test]
async fn logout_during_restore_redirects_to_login() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(200, user_json());
    let release = h.transport.hold_next();
    let guard = NavigationGuard::new(h.auth.clone());

    let (decision, ()) = futures::join!(guard.check_path("/"), async {
        h.auth.logout();
        release.send(()).expect("release");
    });

    assert_eq!(decision, GuardDecision::Redirect("/login"));
    assert!(!h.auth.is_authenticated());
    assert_eq!(h.tokens.get(), None);
}

#[tokio::test]
async fn open_paths_are_allowed_after_restore() {
    let h = harness(None, "/health");
    let guard = NavigationGuard::new(h.auth.clone());

    assert_eq!(guard.check_path("/health").await, GuardDecision::Allow);
}

#[tokio::test]
async fn concurrent_checks_share_one_restore() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(200, user_json());
    let release = h.transport.hold_next();
    let guard = NavigationGuard::new(h.auth.clone());

    let (first, second, ()) =
        futures::join!(guard.check_path("/"), guard.check_path("/tasks"), async {
            release.send(()).expect("release");
        });

    assert_eq!(first, GuardDecision::Allow);
    assert_eq!(second, GuardDecision::Allow);
    assert_eq!(h.transport.requests().len(), 1);
}

#[tokio::test]
async fn logout_after_restore_is_seen_by_next_check() {
    let h = harness(Some("abc123"), "/");
    h.transport.respond(200, user_json());
    let guard = NavigationGuard::new(h.auth.clone());
    assert_eq!(guard.check_path("/").await, GuardDecision::Allow);

    h.auth.logout();

    assert_eq!(guard.check_path("/").await, GuardDecision::Redirect("/login"));
    assert_eq!(guard.check_path("/register").await, GuardDecision::Allow);
}
