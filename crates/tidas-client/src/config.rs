//! Tidas client configuration.
//!
//! Connection settings for the hosted Tidas service. Defaults point to the
//! production deployment. Override via environment variables or explicit
//! construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Production Tidas server.
pub const DEFAULT_SERVER: &str = "https://app.passwordlessapps.com";

/// Default per-call deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for connecting to the Tidas service.
///
/// Custom `Debug` implementation redacts the `api_key` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct TidasConfig {
    /// API key issued for the application. Sent as a bearer credential on
    /// every outbound request.
    pub api_key: Zeroizing<String>,
    /// Application name the key is scoped to.
    pub application: String,
    /// Base URL of the Tidas server.
    /// Default: <https://app.passwordlessapps.com>
    pub server: Url,
    /// Absolute per-call deadline in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for TidasConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TidasConfig")
            .field("api_key", &"[REDACTED]")
            .field("application", &self.application)
            .field("server", &self.server)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl TidasConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TIDAS_API_KEY` (required)
    /// - `TIDAS_APPLICATION` (required)
    /// - `TIDAS_SERVER` (default: `https://app.passwordlessapps.com`)
    /// - `TIDAS_TIMEOUT_SECS` (default: 20)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("TIDAS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let application = std::env::var("TIDAS_APPLICATION")
            .ok()
            .filter(|a| !a.is_empty())
            .ok_or(ConfigError::MissingApplication)?;

        Ok(Self {
            api_key: Zeroizing::new(api_key),
            application,
            server: env_url("TIDAS_SERVER", DEFAULT_SERVER)?,
            timeout_secs: std::env::var("TIDAS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `server` cannot be parsed.
    pub fn local_mock(server: &str, api_key: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: Zeroizing::new(api_key.to_string()),
            application: "test-app".to_string(),
            server: Url::parse(server)
                .map_err(|e| ConfigError::InvalidUrl("server".to_string(), e.to_string()))?,
            timeout_secs: 5,
        })
    }

    /// Check that the configuration can back outbound calls.
    ///
    /// A `TidasClient` refuses construction on a failing config, so no call
    /// can ever be issued with an empty key or a hostless server URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.server.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(
                "server".to_string(),
                format!("URL has no host: {}", self.server),
            ));
        }
        Ok(())
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("api_key is required and must be non-empty (set TIDAS_API_KEY)")]
    MissingApiKey,
    #[error("application is required and must be non-empty (set TIDAS_APPLICATION)")]
    MissingApplication,
    #[error("api_key contains characters not permitted in an HTTP header")]
    InvalidApiKey,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
