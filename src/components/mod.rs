//! Reusable view components shared across pages.

pub mod route_guard;
