//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page is mounted inside a `RouteGuard`, so it can assume the
//! session has been resolved before it renders.

pub mod dashboard;
pub mod login;
pub mod register;
