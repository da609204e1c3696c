//! # crawl-console
//!
//! Leptos + WASM admin console for the crawl-job platform.
//!
//! This crate holds the session core that every console screen relies on:
//! the persisted bearer token, the in-memory session, the request channels
//! with centralized 401 handling, and the navigation guard. It also mounts
//! the login, registration and dashboard screens built on that core.
//!
//! The browser build is the `csr` feature. Without it, browser-backed
//! pieces compile to inert stand-ins so the core can be tested natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod util;

#[cfg(test)]
#[path = "test_helpers_test.rs"]
pub(crate) mod test_helpers;

/// WASM entry point: install the panic hook and logger, then mount `App`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already installed: {e}").into());
    }
    leptos::mount::mount_to_body(app::App);
}
