//! Navigation guard: decides whether a route transition proceeds.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every guarded screen asks the same `NavigationGuard` before rendering.
//! The first check restores the session from the token store; checks that
//! arrive while that restore is running wait for it instead of starting
//! their own.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::routes::{HOME_PATH, LOGIN_PATH, requirement_for_path};
use crate::services::auth::{AuthError, AuthService};

/// Access a route demands of the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRequirement {
    /// Only signed-in operators.
    Authenticated,
    /// Only signed-out visitors (login, registration).
    Guest,
    /// Anyone.
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardPhase {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

/// Pure decision table.
#[must_use]
pub fn decide(requirement: AccessRequirement, is_authenticated: bool) -> GuardDecision {
    match (requirement, is_authenticated) {
        (AccessRequirement::Authenticated, false) => GuardDecision::Redirect(LOGIN_PATH),
        (AccessRequirement::Guest, true) => GuardDecision::Redirect(HOME_PATH),
        _ => GuardDecision::Allow,
    }
}

#[derive(Clone)]
pub struct NavigationGuard {
    auth: AuthService,
    phase: Arc<Mutex<GuardPhase>>,
    gate: Arc<futures::lock::Mutex<()>>,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(auth: AuthService) -> Self {
        Self { auth, phase: Arc::default(), gate: Arc::default() }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    #[must_use]
    pub fn phase(&self) -> GuardPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: GuardPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Decide a navigation to a route with `requirement`, restoring the
    /// session first if this is the first navigation. A failed restore
    /// leaves the session signed out and the table decides as usual.
    pub async fn check(&self, requirement: AccessRequirement) -> GuardDecision {
        self.initialize().await;
        let authenticated = self.auth.is_authenticated();
        let decision = decide(requirement, authenticated);
        log::debug!("guard: {requirement:?} authenticated={authenticated} -> {decision:?}");
        decision
    }

    /// [`NavigationGuard::check`] for a concrete path.
    pub async fn check_path(&self, path: &str) -> GuardDecision {
        self.check(requirement_for_path(path)).await
    }

    async fn initialize(&self) {
        if self.phase() == GuardPhase::Ready {
            return;
        }
        let _gate = self.gate.lock().await;
        if self.phase() == GuardPhase::Ready {
            return;
        }

        self.set_phase(GuardPhase::Initializing);
        let result = self.auth.refresh().await;
        self.set_phase(GuardPhase::Ready);

        match result {
            Ok(outcome) => log::debug!("guard: session restore finished: {outcome:?}"),
            Err(AuthError::Expired) => log::debug!("guard: stored session expired"),
            Err(err) => log::warn!("guard: session restore failed, continuing signed out: {err}"),
        }
    }
}
