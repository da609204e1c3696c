//! Session lifecycle: login, registration, restore on page load, logout.
//!
//! DESIGN
//! ======
//! `AuthService` owns the one `SessionHandle` and the typed API built over
//! both request channels. It is cheap to clone and is handed to the guard
//! and provided through Leptos context.
//!
//! Login persists the token before fetching the profile, and fetches it
//! with that token passed explicitly, so the profile request never
//! depends on a storage round trip. Every failure after the token is held
//! rolls back to a signed-out state.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use crate::net::api::ConsoleApi;
use crate::net::channel::{RequestChannel, RequestOptions};
use crate::net::error::ApiError;
use crate::net::transport::{ChannelConfig, Transport};
use crate::net::types::{LoginRequest, RegisterRequest};
use crate::state::session::SessionHandle;
use crate::util::navigator::Navigator;
use crate::util::token_store::TokenStore;

/// Session-level failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend refused the submitted credentials or account fields.
    #[error("{0}")]
    Rejected(String),
    /// The stored token no longer identifies a user.
    #[error("session expired, please sign in again")]
    Expired,
    /// The session was signed out or replaced while the request was in flight.
    #[error("session changed during the request, please try again")]
    Superseded,
    #[error(transparent)]
    Transport(ApiError),
}

/// Result of restoring a session from the token store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    NoSession,
    Restored,
}

#[derive(Clone)]
pub struct AuthService {
    api: ConsoleApi,
    tokens: Arc<dyn TokenStore>,
    session: SessionHandle,
}

impl AuthService {
    /// Wire one session and both request channels over `transport`.
    #[must_use]
    pub fn new(
        config: ChannelConfig,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let config = Arc::new(config);
        let session = SessionHandle::new();
        let authenticated =
            RequestChannel::authenticated(config.clone(), transport.clone(), tokens.clone(), session.clone(), navigator);
        let anonymous = RequestChannel::anonymous(config, transport);
        Self { api: ConsoleApi::new(authenticated, anonymous), tokens, session }
    }

    #[must_use]
    pub fn api(&self) -> &ConsoleApi {
        &self.api
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Sign in and load the operator's profile.
    ///
    /// # Errors
    ///
    /// `AuthError::Rejected` with the backend's message for bad credentials
    /// or an empty token; `AuthError::Superseded` when the session was
    /// signed out while the profile loaded; `AuthError::Transport` for
    /// anything else. The session is signed out after any failure.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), AuthError> {
        let token = match self.api.login(credentials).await {
            Ok(token) => token,
            Err(err) => {
                self.discard();
                return Err(rejection(err));
            }
        };
        if token.access_token.is_empty() {
            log::warn!("login succeeded without a token");
            self.discard();
            return Err(AuthError::Rejected("login response carried no token".to_owned()));
        }

        self.session.set_token(&token.access_token);
        self.tokens.set(&token.access_token);

        let options = RequestOptions::with_bearer(&token.access_token).without_redirect();
        match self.api.current_user(&options).await {
            Ok(user) => {
                log::debug!("signed in as {}", user.username);
                self.session.set_user(user);
                Ok(())
            }
            Err(ApiError::Superseded) => Err(AuthError::Superseded),
            Err(err) => {
                self.discard();
                Err(rejection(err))
            }
        }
    }

    /// Create an account. The session is not touched.
    ///
    /// # Errors
    ///
    /// `AuthError::Rejected` with the backend's message for taken names or
    /// invalid fields; `AuthError::Transport` for anything else.
    pub async fn register(&self, account: &RegisterRequest) -> Result<(), AuthError> {
        self.api.register(account).await.map_err(rejection)
    }

    /// Restore the session from the token store.
    ///
    /// # Errors
    ///
    /// `AuthError::Expired` when the backend rejects the stored token and
    /// `AuthError::Transport` when it cannot be asked. Both leave the
    /// session signed out. `AuthError::Superseded` when the session was
    /// signed out while the profile loaded.
    pub async fn refresh(&self) -> Result<RefreshOutcome, AuthError> {
        let Some(token) = self.tokens.get() else {
            log::debug!("no stored token");
            return Ok(RefreshOutcome::NoSession);
        };

        self.session.set_token(&token);
        let options = RequestOptions::with_bearer(&token).without_redirect();
        match self.api.current_user(&options).await {
            Ok(user) => {
                log::debug!("restored session for {}", user.username);
                self.session.set_user(user);
                Ok(RefreshOutcome::Restored)
            }
            Err(ApiError::Superseded) => Err(AuthError::Superseded),
            Err(err) if err.is_client_rejection() => {
                log::debug!("stored token rejected: {err}");
                self.discard();
                Err(AuthError::Expired)
            }
            Err(err) => {
                self.discard();
                Err(AuthError::Transport(err))
            }
        }
    }

    /// Sign out locally. No network call; safe to repeat.
    pub fn logout(&self) {
        log::debug!("signing out");
        self.discard();
    }

    fn discard(&self) {
        self.session.clear();
        self.tokens.clear();
    }
}

fn rejection(err: ApiError) -> AuthError {
    if err.is_client_rejection() { AuthError::Rejected(err.message()) } else { AuthError::Transport(err) }
}
