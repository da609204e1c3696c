//! Hard (full page) navigation used by the 401 stage.
//!
//! The request channel cannot reach the Leptos router: a stale background
//! request may fail long after the component that issued it unmounted. It
//! therefore leaves the app through `window.location`, which also resets
//! every piece of in-memory state.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use crate::routes::LOGIN_PATH;

pub trait Navigator: Send + Sync {
    /// Path of the page currently shown (no query or fragment).
    fn current_path(&self) -> String;
    /// Replace the current page with `path`.
    fn hard_navigate(&self, path: &str);
}

/// Navigator backed by `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

#[cfg(feature = "csr")]
impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        let Some(window) = web_sys::window() else {
            return String::new();
        };
        match window.location().pathname() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("could not read location: {err:?}");
                String::new()
            }
        }
    }

    fn hard_navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(err) = window.location().set_href(path) {
            log::warn!("navigation to {path} failed: {err:?}");
        }
    }
}

#[cfg(not(feature = "csr"))]
impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        String::new()
    }

    fn hard_navigate(&self, _path: &str) {}
}

/// True when `current` already shows the login entry point.
#[must_use]
pub fn is_on_login(current: &str) -> bool {
    let trimmed = current.trim_end_matches('/');
    trimmed == LOGIN_PATH
}
