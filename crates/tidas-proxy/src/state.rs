//! # Application State
//!
//! Shared state for the proxy: the server's own configuration plus the
//! currently installed [`TidasClient`]. The client slot starts empty and is
//! filled by [`AppState::configure`], so "not configured yet" is an explicit,
//! observable state rather than a half-initialized client.

use std::sync::Arc;

use parking_lot::RwLock;
use tidas_client::{TidasClient, TidasConfig, TidasError};

// -- Application Configuration ------------------------------------------------

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token for inbound authentication.
    /// If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

// -- Application State --------------------------------------------------------

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: the client slot is behind an `Arc`, so clones handed to
/// Axum all observe the same configuration.
///
/// `parking_lot::RwLock` guards the slot because the client can be swapped at
/// runtime by [`AppState::configure`] while handlers read it concurrently.
/// `parking_lot` never poisons on panic, eliminating the entire class of
/// lock-poisoning runtime failures. Handlers take a cloned snapshot and drop
/// the guard before any `.await`, so a call in flight keeps using the client
/// it started with even if a reconfigure lands mid-call.
#[derive(Debug, Clone)]
pub struct AppState {
    tidas: Arc<RwLock<Option<TidasClient>>>,
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration and no
    /// identity client installed.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application state with the given configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            tidas: Arc::new(RwLock::new(None)),
            config,
        }
    }

    /// Build a [`TidasClient`] from `config` and install it.
    ///
    /// Validates the configuration via client construction before touching
    /// the slot: on failure the previously installed client (if any) stays in
    /// service. Calling again replaces the client wholesale; the last
    /// successful call wins. Safe to call with identical configuration any
    /// number of times.
    pub fn configure(&self, config: TidasConfig) -> Result<(), TidasError> {
        let client = TidasClient::new(config)?;
        *self.tidas.write() = Some(client);
        Ok(())
    }

    /// Snapshot the currently installed identity client.
    ///
    /// Returns `None` until the first successful [`AppState::configure`].
    /// The clone is cheap (shared connection pool) and the guard is released
    /// before this returns, so callers can hold the snapshot across `.await`.
    pub fn identity_client(&self) -> Option<TidasClient> {
        self.tidas.read().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
