//! Typed console endpoints over the two request channels.
//!
//! Login and registration ride the anonymous channel; everything else
//! rides the authenticated one and inherits its 401 handling.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::channel::{RequestChannel, RequestOptions};
use super::error::ApiError;
use super::transport::{Body, Method};
use super::types::{LoginRequest, Msg, PasswordUpdate, RegisterRequest, TokenResponse, User, UserStats, UserUpdate};

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const USERS_ENDPOINT: &str = "/users";
pub const CURRENT_USER_ENDPOINT: &str = "/users/me";
pub const PASSWORD_ENDPOINT: &str = "/users/me/password";
pub const STATS_ENDPOINT: &str = "/users/me/stats";

#[derive(Clone)]
pub struct ConsoleApi {
    authenticated: RequestChannel,
    anonymous: RequestChannel,
}

impl ConsoleApi {
    #[must_use]
    pub fn new(authenticated: RequestChannel, anonymous: RequestChannel) -> Self {
        Self { authenticated, anonymous }
    }

    /// The authenticated channel, for feature endpoints not wrapped here.
    #[must_use]
    pub fn channel(&self) -> &RequestChannel {
        &self.authenticated
    }

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` on bad credentials, otherwise any pipeline error.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let body = Body::Form(credentials.form_fields());
        self.anonymous.request(Method::Post, LOGIN_ENDPOINT, body, &RequestOptions::default()).await
    }

    /// Create an account. The response body is not needed.
    ///
    /// # Errors
    ///
    /// `ApiError::Status` with the backend's detail when the name or email
    /// is taken, otherwise any pipeline error.
    pub async fn register(&self, account: &RegisterRequest) -> Result<(), ApiError> {
        let body = Body::json(account)?;
        self.anonymous.execute(Method::Post, USERS_ENDPOINT, body, &RequestOptions::default()).await
    }

    /// # Errors
    ///
    /// Any pipeline error; 401 also ends the session.
    pub async fn current_user(&self, options: &RequestOptions) -> Result<User, ApiError> {
        self.authenticated.request(Method::Get, CURRENT_USER_ENDPOINT, Body::Empty, options).await
    }

    /// # Errors
    ///
    /// Any pipeline error; 401 also ends the session.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.authenticated.put(CURRENT_USER_ENDPOINT, Body::json(update)?).await
    }

    /// # Errors
    ///
    /// `ApiError::Status` when the current password is wrong, otherwise any
    /// pipeline error.
    pub async fn update_password(&self, update: &PasswordUpdate) -> Result<Msg, ApiError> {
        self.authenticated.put(PASSWORD_ENDPOINT, Body::json(update)?).await
    }

    /// # Errors
    ///
    /// Any pipeline error; 401 also ends the session.
    pub async fn user_stats(&self) -> Result<UserStats, ApiError> {
        self.authenticated.get(STATS_ENDPOINT).await
    }
}
