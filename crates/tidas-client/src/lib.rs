//! # tidas-client -- Typed Rust client for the Tidas identity API
//!
//! Provides typed access to the three remote operations of the hosted Tidas
//! passwordless-identity service:
//!
//! | Method | Path        | Operation                                     |
//! |--------|-------------|-----------------------------------------------|
//! | GET    | `/ping`     | Service health check                          |
//! | POST   | `/enroll`   | Register an identity payload                  |
//! | POST   | `/validate` | Compare a payload against an enrolled identity|
//!
//! ## Call Semantics
//!
//! Every operation issues **exactly one** outbound request -- there is no
//! automatic retry, so a non-idempotent enrollment is never silently
//! duplicated. The caller decides whether and when to retry. The configured
//! timeout is the absolute per-call deadline.
//!
//! Identity payloads are opaque: `enroll` and `validate` forward the
//! caller's JSON value and identifier to the provider exactly as given.
//! The matching algorithm, payload schema, and identifier lifecycle are all
//! provider-owned.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, TidasConfig};
pub use error::TidasError;
pub use types::{EnrollOptions, IdentityResult, ServiceFault};

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::types::CallEnvelope;

/// Client for the Tidas identity service.
///
/// Cheap to clone: the underlying `reqwest` connection pool is shared
/// across clones. No operation mutates the client, so a single instance can
/// serve concurrent calls.
#[derive(Debug, Clone)]
pub struct TidasClient {
    http: reqwest::Client,
    server: Url,
    application: String,
    timeout_secs: u64,
}

impl TidasClient {
    /// Create a new Tidas client from configuration.
    ///
    /// Fails fast on an unusable configuration (empty API key, hostless
    /// server URL) so that no call can ever be issued against unconfigured
    /// state. The API key is installed as a default `Authorization: Bearer`
    /// header, marked sensitive so HTTP-layer logging will not print it.
    pub fn new(config: TidasConfig) -> Result<Self, TidasError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_key.as_str()
                ))
                .map_err(|_| TidasError::Config(ConfigError::InvalidApiKey))?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| TidasError::Transport {
                endpoint: "client_init",
                source: e,
            })?;

        Ok(Self {
            http,
            server: config.server,
            application: config.application,
            timeout_secs: config.timeout_secs,
        })
    }

    /// The configured server base URL.
    pub fn server(&self) -> &Url {
        &self.server
    }

    /// The application name calls are scoped to.
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Health-check the Tidas service.
    ///
    /// Calls `GET {server}/ping`. No payload is sent.
    pub async fn ping(&self) -> Result<IdentityResult, TidasError> {
        const ENDPOINT: &str = "GET /ping";
        let url = self.endpoint_url("ping");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.send_error(ENDPOINT, e))?;

        self.read_result(ENDPOINT, resp).await
    }

    /// Register an identity payload with the provider.
    ///
    /// Calls `POST {server}/enroll`. `data` and `options.tidas_id` are
    /// forwarded exactly as given; when `tidas_id` is absent the provider
    /// assigns one and the result echoes the effective identifier.
    /// Concurrent enrollments under the same identifier are resolved by the
    /// provider, not serialized here.
    pub async fn enroll(
        &self,
        data: &Value,
        options: &EnrollOptions,
    ) -> Result<IdentityResult, TidasError> {
        const ENDPOINT: &str = "POST /enroll";
        let url = self.endpoint_url("enroll");
        let envelope = CallEnvelope {
            application: &self.application,
            data,
            tidas_id: options.tidas_id.as_deref(),
        };

        let resp = self
            .http
            .post(&url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| self.send_error(ENDPOINT, e))?;

        self.read_result(ENDPOINT, resp).await
    }

    /// Compare an identity payload against a previously enrolled identity.
    ///
    /// Calls `POST {server}/validate`. A mismatch is a completed call with a
    /// negative outcome: `Ok(IdentityResult { success: false, .. })`, never
    /// an `Err`.
    pub async fn validate(
        &self,
        data: &Value,
        tidas_id: &str,
    ) -> Result<IdentityResult, TidasError> {
        const ENDPOINT: &str = "POST /validate";
        let url = self.endpoint_url("validate");
        let envelope = CallEnvelope {
            application: &self.application,
            data,
            tidas_id: Some(tidas_id),
        };

        let resp = self
            .http
            .post(&url)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| self.send_error(ENDPOINT, e))?;

        self.read_result(ENDPOINT, resp).await
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{path}", self.server.as_str().trim_end_matches('/'))
    }

    /// Map a send-phase error into the taxonomy: deadline overruns become
    /// [`TidasError::Timeout`], everything else is transport-level.
    fn send_error(&self, endpoint: &'static str, source: reqwest::Error) -> TidasError {
        if source.is_timeout() {
            TidasError::Timeout {
                endpoint,
                timeout_secs: self.timeout_secs,
            }
        } else {
            TidasError::Transport { endpoint, source }
        }
    }

    /// Turn an HTTP response into an [`IdentityResult`] or the matching error.
    ///
    /// Non-success statuses become [`TidasError::Service`] with the remote
    /// error body parsed into a [`ServiceFault`]. Success statuses with a
    /// body that does not deserialize become [`TidasError::UpstreamProtocol`]
    /// (the deadline can also expire mid-body, which still maps to
    /// [`TidasError::Timeout`]).
    async fn read_result(
        &self,
        endpoint: &'static str,
        resp: reqwest::Response,
    ) -> Result<IdentityResult, TidasError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let fault = ServiceFault::from_body(&body);
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                fault = %fault,
                "tidas call rejected by provider"
            );
            return Err(TidasError::Service {
                endpoint,
                status: status.as_u16(),
                fault,
            });
        }

        resp.json::<IdentityResult>().await.map_err(|e| {
            if e.is_timeout() {
                TidasError::Timeout {
                    endpoint,
                    timeout_secs: self.timeout_secs,
                }
            } else {
                TidasError::UpstreamProtocol {
                    endpoint,
                    source: e,
                }
            }
        })
    }
}
