//! Wire DTOs for the console REST API.
//!
//! DESIGN
//! ======
//! These types mirror the backend's user and token schemas so serde
//! round-trips stay lossless. Optional profile fields default to `None`
//! because older accounts omit them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Credentials submitted to `POST /auth/login` as a form body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    /// Form fields in the order the backend's OAuth2 password form expects.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        vec![
            ("username".to_owned(), self.username.clone()),
            ("password".to_owned(), self.password.clone()),
        ]
    }
}

/// Account fields submitted to `POST /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response body of a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer credential.
    pub access_token: String,
    /// Token scheme, always `"bearer"` in practice.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

/// The authenticated operator as returned by `GET /users/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric account identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact email, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// Disabled accounts cannot log in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Administrators can manage every project and node.
    #[serde(default)]
    pub is_superuser: bool,
    /// ISO 8601 creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Display name shown in the header.
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// ISO 8601 timestamp of the last profile change.
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn default_true() -> bool {
    true
}

impl User {
    /// Name to show in the console chrome: full name when set, else username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

/// Partial profile update sent to `PUT /users/me`. Absent fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Password change sent to `PUT /users/me/password`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

/// Plain acknowledgement body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msg {
    pub msg: String,
}

/// Per-user usage counters from `GET /users/me/stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub projects: u64,
    pub tasks: u64,
    pub executions: u64,
}
