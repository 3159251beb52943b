//! Shared application state injected into every Axum handler.

use crate::keys::Keyring;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the keyring is `Arc`-backed, so Axum can clone the state
/// for each request without copying secret material.
#[derive(Clone)]
pub struct AppState {
    /// Versioned master secrets.
    pub keyring: Keyring,
}

impl AppState {
    /// Create a new [`AppState`] around a loaded keyring.
    pub fn new(keyring: Keyring) -> Self {
        Self { keyring }
    }
}
