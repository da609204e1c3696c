//! HTTP transport seam shared by the request channels.
//!
//! Browser (csr): real calls via `gloo-net`; the request and the body read
//! together race a `gloo-timers` sleep for the configured timeout.
//! Elsewhere: `BrowserTransport` answers `ApiError::Unavailable` since the
//! console only talks to its backend from the browser. Tests substitute a
//! scripted `Transport`.
//!
//! DESIGN
//! ======
//! The trait speaks in fully prepared requests: the channel has already
//! joined the base path, chosen headers, and attached credentials. A
//! transport only moves bytes and reports status.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::pin::pin;
use std::time::Duration;

use futures::future::{Either, select};
use serde::Serialize;

use super::error::ApiError;

pub const DEFAULT_API_BASE: &str = "/api/v1";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

// =============================================================================
// CONFIG
// =============================================================================

/// Transport settings shared by the authenticated and anonymous channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Prefix joined in front of every endpoint path.
    pub base_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { base_path: DEFAULT_API_BASE.to_owned(), timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS) }
    }
}

impl ChannelConfig {
    /// Build config from values baked in at compile time.
    ///
    /// Optional:
    /// - `CONSOLE_API_BASE`: default `/api/v1`
    /// - `CONSOLE_API_TIMEOUT_MS`: default 10000
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_raw(option_env!("CONSOLE_API_BASE"), option_env!("CONSOLE_API_TIMEOUT_MS"))
    }

    /// Parse raw overrides, falling back to defaults for missing or invalid values.
    #[must_use]
    pub fn from_raw(base_path: Option<&str>, timeout_ms: Option<&str>) -> Self {
        let base_path = base_path
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map_or_else(|| DEFAULT_API_BASE.to_owned(), |raw| raw.trim_end_matches('/').to_owned());
        let timeout_ms = match timeout_ms.map(|raw| raw.trim().parse::<u64>()) {
            Some(Ok(ms)) if ms > 0 => ms,
            _ => DEFAULT_TIMEOUT_MS,
        };
        Self { base_path, timeout: Duration::from_millis(timeout_ms) }
    }

    /// Join the base path and an endpoint path with exactly one slash.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_path.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Request payload; the variant decides the content type.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

impl Body {
    /// Serialize any value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Encode` if the value cannot be represented as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value).map(Self::Json).map_err(|e| ApiError::Encode(e.to_string()))
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Json(_) => Some(CONTENT_TYPE_JSON),
            Self::Form(_) => Some(CONTENT_TYPE_FORM),
        }
    }
}

/// A fully prepared request, ready for the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
    pub timeout: Duration,
}

impl HttpRequest {
    /// First header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Moves one prepared request to the backend and returns the raw answer.
///
/// Implementations return `Ok` for every HTTP status; only transport
/// failures (timeout, network, unreadable body) are `Err`.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Resolve `work` unless `deadline` completes first, in which case the
/// result is `ApiError::Timeout { millis }`. `work` must cover the whole
/// exchange, body read included.
///
/// # Errors
///
/// `work`'s own error, or `ApiError::Timeout`.
pub async fn within_deadline<T, W, D>(work: W, deadline: D, millis: u64) -> Result<T, ApiError>
where
    W: Future<Output = Result<T, ApiError>>,
    D: Future<Output = ()>,
{
    match select(pin!(work), pin!(deadline)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ApiError::Timeout { millis }),
    }
}

/// `gloo-net` transport used by the browser build.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        use gloo_net::http::Request;

        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let prepared = match &request.body {
            Body::Empty => builder.build(),
            Body::Json(value) => builder.body(value.to_string()),
            Body::Form(fields) => {
                let params = web_sys::UrlSearchParams::new()
                    .map_err(|e| ApiError::Encode(format!("form body: {e:?}")))?;
                for (name, value) in fields {
                    params.append(name, value);
                }
                builder.body(params)
            }
        }
        .map_err(|e| ApiError::Encode(e.to_string()))?;

        let millis = u64::try_from(request.timeout.as_millis()).unwrap_or(u64::MAX);
        let exchange = async move {
            let response = prepared.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
            let status = response.status();
            let body = response.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
            Ok(HttpResponse { status, body })
        };
        within_deadline(exchange, gloo_timers::future::sleep(request.timeout), millis).await
    }
}

#[cfg(not(feature = "csr"))]
#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Err(ApiError::Unavailable)
    }
}
