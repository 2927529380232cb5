//! Error types for Tidas API calls.
//!
//! Every remote-facing variant carries the endpoint it occurred on so that
//! log lines and surfaced errors name the failing operation. The taxonomy
//! separates failures that happened before a response (`Transport`,
//! `Timeout`) from failures reported by or about the response (`Service`,
//! `UpstreamProtocol`).

use crate::config::ConfigError;
use crate::types::ServiceFault;

/// Errors produced by [`crate::TidasClient`] construction and operations.
#[derive(Debug, thiserror::Error)]
pub enum TidasError {
    /// The client could not be built from its configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network-level failure before a response was received.
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The configured deadline elapsed before the call completed.
    #[error("{endpoint} timed out after {timeout_secs}s")]
    Timeout {
        endpoint: &'static str,
        timeout_secs: u64,
    },

    /// The provider rejected the call with a non-success HTTP status.
    #[error("{endpoint} returned status {status}: {fault}")]
    Service {
        endpoint: &'static str,
        status: u16,
        fault: ServiceFault,
    },

    /// The provider answered with a success status but an unparseable body.
    #[error("unparseable response from {endpoint}: {source}")]
    UpstreamProtocol {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl TidasError {
    /// The endpoint this error occurred on, if it is remote-facing.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Service { endpoint, .. }
            | Self::UpstreamProtocol { endpoint, .. } => Some(endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_names_endpoint_and_deadline() {
        let err = TidasError::Timeout {
            endpoint: "POST /enroll",
            timeout_secs: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("POST /enroll"));
        assert!(msg.contains("20s"));
    }

    #[test]
    fn service_display_includes_fault() {
        let err = TidasError::Service {
            endpoint: "POST /validate",
            status: 422,
            fault: ServiceFault {
                code: Some("NO_MATCH".into()),
                message: "payload does not match".into(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("NO_MATCH"));
        assert!(msg.contains("payload does not match"));
    }

    #[test]
    fn config_error_converts() {
        let err = TidasError::from(ConfigError::MissingApiKey);
        assert!(matches!(err, TidasError::Config(_)));
        assert!(err.endpoint().is_none());
    }

    #[test]
    fn endpoint_accessor_covers_remote_variants() {
        let err = TidasError::Timeout {
            endpoint: "GET /ping",
            timeout_secs: 5,
        };
        assert_eq!(err.endpoint(), Some("GET /ping"));
    }
}
