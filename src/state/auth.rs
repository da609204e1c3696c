//! Reactive mirror of the session for the Leptos view layer.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionHandle` is not reactive. Pages and the route guard publish a
//! fresh `AuthState` into an `RwSignal` after every session transition so
//! user-aware components re-render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;
use crate::state::session::Session;

/// Authentication state as rendered: current user, derived flag, and
/// whether the first-load session check is still running.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub authenticated: bool,
    pub loading: bool,
}

impl AuthState {
    /// State before the guard has resolved the session.
    #[must_use]
    pub fn pending() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Resolved state copied from a session snapshot.
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self { user: session.user().cloned(), authenticated: session.is_authenticated(), loading: false }
    }

    /// Name for the header, empty while signed out.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user.as_ref().map(|user| user.display_name().to_owned()).unwrap_or_default()
    }
}
