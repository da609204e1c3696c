//! Transport-level error taxonomy shared by both request channels.
//!
//! ERROR HANDLING
//! ==============
//! Every variant carries owned strings so errors can be cloned into UI
//! state and compared in tests. Status errors keep the backend's
//! `detail` text because that is what operators need to read.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// HTTP status the backend uses for missing, invalid, or expired tokens.
pub const STATUS_UNAUTHORIZED: u16 = 401;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", .detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },
    #[error("request failed ({status}): {detail}")]
    Status { status: u16, detail: String },
    #[error("request timed out after {millis} ms")]
    Timeout { millis: u64 },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(String),
    #[error("response discarded: the session changed while the request was in flight")]
    Superseded,
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Build the error for a non-success HTTP status and its raw body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        if status == STATUS_UNAUTHORIZED {
            return Self::Unauthorized { detail };
        }
        Self::Status { status, detail: detail.unwrap_or_else(|| default_status_detail(status)) }
    }

    /// HTTP status when the backend answered, `None` for transport failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(STATUS_UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 4xx answers: the backend understood and refused the request.
    #[must_use]
    pub fn is_client_rejection(&self) -> bool {
        self.status().is_some_and(|status| (400..500).contains(&status))
    }

    /// Backend-supplied text when there is one, else the display form.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { detail: Some(detail) } | Self::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull the human-readable `detail` out of a backend error body.
///
/// Accepts `{"detail": "..."}` and validation lists of the form
/// `{"detail": [{"msg": "..."}, ...]}`; anything else yields `None`.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        serde_json::Value::Array(items) => {
            let messages = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>();
            if messages.is_empty() { None } else { Some(messages.join("; ")) }
        }
        _ => None,
    }
}

fn default_status_detail(status: u16) -> String {
    match status {
        400 => "bad request".to_owned(),
        403 => "forbidden".to_owned(),
        404 => "not found".to_owned(),
        422 => "validation failed".to_owned(),
        500..=599 => "server error".to_owned(),
        _ => format!("unexpected status {status}"),
    }
}
