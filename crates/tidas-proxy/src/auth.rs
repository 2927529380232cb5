//! # Authentication Middleware
//!
//! Static bearer token middleware for the proxy's API surface.
//!
//! ## Token Format
//!
//! ```text
//! Authorization: Bearer {secret}
//! ```
//!
//! The expected secret comes from the `AUTH_TOKEN` environment variable.
//! When no token is configured, authentication is disabled and every request
//! passes through (development mode). Health probes are mounted outside this
//! middleware and never require a token.
//!
//! This token authenticates callers *to the proxy*. It is unrelated to the
//! Tidas API key the proxy presents upstream.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use crate::error::{ErrorBody, ErrorDetail};

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing constant regardless of length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// When `AuthConfig.token` is `None`, all requests are allowed
/// (auth disabled / development mode).
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    if constant_time_token_eq(provided, expected) {
                        next.run(request).await
                    } else {
                        tracing::warn!("authentication failed: invalid bearer token");
                        unauthorized_response("invalid bearer token")
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => next.run(request).await,
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        success: false,
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}
