//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the framework-agnostic source of truth; `auth` is its
//! reactive mirror for the view layer.

pub mod auth;
pub mod session;
