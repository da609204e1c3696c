//! In-memory session: the client's belief about the current operator.
//!
//! DESIGN
//! ======
//! `Session` is plain data; `SessionHandle` is the single shared instance
//! built once in `App` and handed to the auth service and both request
//! channels. Only crate code can mutate it, so feature screens see
//! snapshots and the predicate `is_authenticated`, never raw setters.
//!
//! The generation counter increments on every clear. A request records the
//! generation at dispatch; if it changed by the time the response arrives,
//! the response belongs to a session that no longer exists.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::net::types::User;

/// Operator identity as known to the client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// True iff a non-empty token is held. A user object alone never counts.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

#[derive(Debug, Default)]
struct SessionInner {
    session: Session,
    generation: u64,
}

/// Shared handle to the one `Session` of this page lifetime.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionInner>>,
}

impl SessionHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().session.token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().session.user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_authenticated()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Hold `token`; an empty string clears the token instead.
    pub(crate) fn set_token(&self, token: &str) {
        let mut inner = self.lock();
        inner.session.token = if token.is_empty() { None } else { Some(token.to_owned()) };
    }

    pub(crate) fn set_user(&self, user: User) {
        self.lock().session.user = Some(user);
    }

    /// Drop user and token and start a new generation.
    pub(crate) fn clear(&self) {
        let mut inner = self.lock();
        inner.session = Session::default();
        inner.generation = inner.generation.wrapping_add(1);
    }
}
