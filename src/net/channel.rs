//! Request channels: the one calling convention feature code uses to reach
//! the backend.
//!
//! ARCHITECTURE
//! ============
//! Each call runs the same explicit pipeline:
//!
//! 1. request stage: join the base path, pick headers, and (authenticated
//!    channel only) read the token store and attach `Authorization`.
//! 2. dispatch through the shared `Transport`.
//! 3. response stage: map statuses to `ApiError`; on 401 the authenticated
//!    channel clears the token store and session, then hard-navigates to
//!    the login page unless it is already showing or the caller opted out.
//!
//! The anonymous channel skips token injection and 401 side effects so a
//! stale stored token can never interfere with login or registration.
//!
//! ERROR HANDLING
//! ==============
//! Errors always reach the caller after the stages run. Cleanup finishes
//! before the caller's error path, so the caller never sees a stale token.
//! Transport failures (timeouts, network) pass through untouched and never
//! trigger the 401 cleanup.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::error::{ApiError, STATUS_UNAUTHORIZED};
use super::transport::{Body, ChannelConfig, HttpRequest, HttpResponse, Method, Transport};
use crate::routes::LOGIN_PATH;
use crate::state::session::SessionHandle;
use crate::util::navigator::{Navigator, is_on_login};
use crate::util::token_store::TokenStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    Authenticated,
    Anonymous,
}

/// Per-call adjustments to the pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Explicit bearer token; takes precedence over the token store.
    pub bearer: Option<String>,
    /// Skip the hard navigation on 401 (cleanup still runs).
    pub suppress_redirect: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn with_bearer(token: &str) -> Self {
        Self { bearer: Some(token.to_owned()), ..Self::default() }
    }

    #[must_use]
    pub fn without_redirect(mut self) -> Self {
        self.suppress_redirect = true;
        self
    }
}

/// Session collaborators the authenticated channel reads and invalidates.
#[derive(Clone)]
struct SessionBinding {
    tokens: Arc<dyn TokenStore>,
    session: SessionHandle,
    navigator: Arc<dyn Navigator>,
}

#[derive(Clone)]
pub struct RequestChannel {
    config: Arc<ChannelConfig>,
    transport: Arc<dyn Transport>,
    binding: Option<SessionBinding>,
}

impl RequestChannel {
    /// Channel that injects the stored token and reacts to 401.
    #[must_use]
    pub fn authenticated(
        config: Arc<ChannelConfig>,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenStore>,
        session: SessionHandle,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { config, transport, binding: Some(SessionBinding { tokens, session, navigator }) }
    }

    /// Channel for login and registration: no token, no 401 side effects.
    #[must_use]
    pub fn anonymous(config: Arc<ChannelConfig>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport, binding: None }
    }

    #[must_use]
    pub fn kind(&self) -> ChannelKind {
        if self.binding.is_some() { ChannelKind::Authenticated } else { ChannelKind::Anonymous }
    }

    #[must_use]
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Run the pipeline and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's `ApiError`, or `ApiError::Decode` if the body
    /// does not match `R`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Body,
        options: &RequestOptions,
    ) -> Result<R, ApiError> {
        let response = self.send(method, path, body, options).await?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Run the pipeline and ignore the response body.
    ///
    /// # Errors
    ///
    /// Returns the pipeline's `ApiError`.
    pub async fn execute(&self, method: Method, path: &str, body: Body, options: &RequestOptions) -> Result<(), ApiError> {
        self.send(method, path, body, options).await.map(|_| ())
    }

    /// Run the pipeline and return the raw successful response.
    ///
    /// # Errors
    ///
    /// Transport failures unchanged; non-2xx statuses as `ApiError::Status`
    /// or `ApiError::Unauthorized`; `ApiError::Superseded` when the session
    /// was cleared while the request was in flight.
    pub async fn send(&self, method: Method, path: &str, body: Body, options: &RequestOptions) -> Result<HttpResponse, ApiError> {
        let request = self.prepare(method, path, body, options);
        let generation = self.binding.as_ref().map(|binding| binding.session.generation());
        log::debug!("{} {}", method.as_str(), request.url);
        let result = self.transport.send(request).await;
        self.inspect(result, generation, options)
    }

    /// `GET` with default options.
    ///
    /// # Errors
    ///
    /// See [`RequestChannel::request`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(Method::Get, path, Body::Empty, &RequestOptions::default()).await
    }

    /// `PUT` a JSON body with default options.
    ///
    /// # Errors
    ///
    /// See [`RequestChannel::request`].
    pub async fn put<R: DeserializeOwned>(&self, path: &str, body: Body) -> Result<R, ApiError> {
        self.request(Method::Put, path, body, &RequestOptions::default()).await
    }

    /// `POST` a body with default options.
    ///
    /// # Errors
    ///
    /// See [`RequestChannel::request`].
    pub async fn post<R: DeserializeOwned>(&self, path: &str, body: Body) -> Result<R, ApiError> {
        self.request(Method::Post, path, body, &RequestOptions::default()).await
    }

    /// `DELETE` with default options, ignoring the body.
    ///
    /// # Errors
    ///
    /// See [`RequestChannel::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, path, Body::Empty, &RequestOptions::default()).await
    }

    // =========================================================================
    // PIPELINE STAGES
    // =========================================================================

    fn prepare(&self, method: Method, path: &str, body: Body, options: &RequestOptions) -> HttpRequest {
        let mut headers = vec![("Accept".to_owned(), "application/json".to_owned())];
        if let Some(content_type) = body.content_type() {
            headers.push(("Content-Type".to_owned(), content_type.to_owned()));
        }
        let bearer = match (&options.bearer, &self.binding) {
            (Some(explicit), _) => Some(explicit.clone()),
            (None, Some(binding)) => binding.tokens.get(),
            (None, None) => None,
        };
        if let Some(token) = bearer.filter(|token| !token.is_empty()) {
            headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
        }
        HttpRequest { method, url: self.config.endpoint_url(path), headers, body, timeout: self.config.timeout }
    }

    fn inspect(
        &self,
        result: Result<HttpResponse, ApiError>,
        generation: Option<u64>,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ApiError> {
        let response = result?;
        let Some(binding) = &self.binding else {
            return into_result(response);
        };

        let current = binding.session.generation();
        let stale = generation.is_some_and(|dispatched| dispatched != current);
        if response.status == STATUS_UNAUTHORIZED {
            if stale {
                log::debug!("ignoring 401 from a session that already ended");
            } else {
                expire_session(binding, options);
            }
            return into_result(response);
        }
        if stale {
            return Err(ApiError::Superseded);
        }
        into_result(response)
    }
}

fn into_result(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() { Ok(response) } else { Err(ApiError::from_status(response.status, &response.body)) }
}

fn expire_session(binding: &SessionBinding, options: &RequestOptions) {
    log::warn!("backend rejected the session token; signing out");
    binding.tokens.clear();
    binding.session.clear();
    if options.suppress_redirect {
        return;
    }
    if !is_on_login(&binding.navigator.current_path()) {
        binding.navigator.hard_navigate(LOGIN_PATH);
    }
}
