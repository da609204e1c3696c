//! Persistent bearer-token storage.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token store is the single source of truth for "do we believe we are
//! logged in" across page loads. The request channel reads it on every
//! dispatch; the auth service and the 401 stage are its only writers.
//!
//! Browser (csr): `localStorage["token"]`. Elsewhere `LocalTokenStore` is
//! inert and `MemoryTokenStore` stands in.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::{Mutex, PoisonError};

/// `localStorage` key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Key-value persistence for a single bearer token.
///
/// `set` and `clear` must be atomic and idempotent; no caller holds a lock
/// across them. Empty values read back as absent.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

/// Token store backed by browser `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalTokenStore;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    let window = web_sys::window()?;
    match window.local_storage() {
        Ok(storage) => storage,
        Err(err) => {
            log::warn!("localStorage unavailable: {err:?}");
            None
        }
    }
}

#[cfg(feature = "csr")]
impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        let storage = local_storage()?;
        match storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(value) => value.filter(|token| !token.is_empty()),
            Err(err) => {
                log::warn!("token read failed: {err:?}");
                None
            }
        }
    }

    fn set(&self, token: &str) {
        let Some(storage) = local_storage() else {
            return;
        };
        if let Err(err) = storage.set_item(TOKEN_STORAGE_KEY, token) {
            log::warn!("token write failed: {err:?}");
        }
    }

    fn clear(&self) {
        let Some(storage) = local_storage() else {
            return;
        };
        if let Err(err) = storage.remove_item(TOKEN_STORAGE_KEY) {
            log::warn!("token removal failed: {err:?}");
        }
    }
}

#[cfg(not(feature = "csr"))]
impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        None
    }

    fn set(&self, _token: &str) {}

    fn clear(&self) {}
}

/// In-process token store for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if saved by an earlier page session.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
