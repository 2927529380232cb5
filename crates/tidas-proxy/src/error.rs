//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps local parse/validation failures and `tidas-client` call failures to
//! HTTP status codes. Returns JSON error response bodies with error code,
//! message, and details. Never exposes internal error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tidas_client::TidasError;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses use this format: `success` is always `false`, and
/// `error` carries the machine-readable code plus a human-readable message.
/// The `details` field carries additional context for client errors but is
/// omitted for 500-class errors to prevent information leakage.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "PARSE_ERROR", "TIMEOUT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// A handler invocation terminates in exactly one of three ways: a local
/// client error (`Parse`/`Validation`, answered before any remote call), a
/// mapped remote failure, or a success response. `Service` deliberately
/// maps to 422 rather than a 5xx: the provider completed the call and
/// rejected its content, which is a statement about the request.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed as JSON (400).
    #[error("parse error: {0}")]
    Parse(String),

    /// Required field missing or of the wrong type (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Identity client not configured (503).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure reaching the identity provider (502).
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider call exceeded its deadline (504).
    #[error("timeout: {0}")]
    Timeout(String),

    /// Provider rejected the call with a non-success status (422).
    #[error("service error: {0}")]
    Service(String),

    /// Provider returned a success status with an unparseable body (502).
    #[error("upstream protocol error: {0}")]
    UpstreamProtocol(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Parse(_) => (StatusCode::BAD_REQUEST, "PARSE_ERROR"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Configuration(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR"),
            Self::Transport(_) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR"),
            Self::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            Self::Service(_) => (StatusCode::UNPROCESSABLE_ENTITY, "SERVICE_ERROR"),
            Self::UpstreamProtocol(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_PROTOCOL"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        // Log internal errors for operator visibility.
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert identity-client call failures to API errors.
///
/// The mapping mirrors the client taxonomy one-to-one so that callers can
/// distinguish a provider rejection from a dead network from an overrun
/// deadline by status code alone.
impl From<TidasError> for AppError {
    fn from(err: TidasError) -> Self {
        match &err {
            TidasError::Config(_) => Self::Configuration(err.to_string()),
            TidasError::Transport { .. } => Self::Transport(err.to_string()),
            TidasError::Timeout { .. } => Self::Timeout(err.to_string()),
            TidasError::Service { .. } => Self::Service(err.to_string()),
            TidasError::UpstreamProtocol { .. } => Self::UpstreamProtocol(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidas_client::{ConfigError, ServiceFault};

    #[test]
    fn parse_status_code() {
        let err = AppError::Parse("malformed JSON".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "PARSE_ERROR");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("tidasBlob is required".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn configuration_status_code() {
        let err = AppError::Configuration("client not configured".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "CONFIGURATION_ERROR");
    }

    #[test]
    fn transport_status_code() {
        let err = AppError::Transport("connection refused".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "TRANSPORT_ERROR");
    }

    #[test]
    fn timeout_status_code() {
        let err = AppError::Timeout("deadline elapsed".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "TIMEOUT");
    }

    #[test]
    fn service_status_code() {
        let err = AppError::Service("provider rejected call".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "SERVICE_ERROR");
    }

    #[test]
    fn upstream_protocol_status_code() {
        let err = AppError::UpstreamProtocol("garbage body".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_PROTOCOL");
    }

    #[test]
    fn internal_status_code() {
        let err = AppError::Internal("lock poisoned".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "INTERNAL_ERROR");
    }

    #[test]
    fn error_display_messages() {
        assert!(format!("{}", AppError::Parse("x".into())).contains("x"));
        assert!(format!("{}", AppError::Validation("y".into())).contains("y"));
        assert!(format!("{}", AppError::Configuration("z".into())).contains("z"));
        assert!(format!("{}", AppError::Transport("a".into())).contains("a"));
        assert!(format!("{}", AppError::Timeout("b".into())).contains("b"));
        assert!(format!("{}", AppError::Service("c".into())).contains("c"));
        assert!(format!("{}", AppError::UpstreamProtocol("d".into())).contains("d"));
        assert!(format!("{}", AppError::Internal("e".into())).contains("e"));
    }

    #[test]
    fn error_body_serializes_with_success_false() {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "TEST");
        assert!(json["error"].get("details").is_none()); // skipped when None
    }

    #[test]
    fn error_body_with_details_serializes() {
        let body = ErrorBody {
            success: false,
            error: ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: "bad input".to_string(),
                details: Some(serde_json::json!({"field": "tidas_id"})),
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("details"));
        assert!(json.contains("tidas_id"));
    }

    // ── From<TidasError> mapping ─────────────────────────────────

    #[test]
    fn client_timeout_maps_to_timeout() {
        let err = AppError::from(TidasError::Timeout {
            endpoint: "POST /enroll",
            timeout_secs: 20,
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(code, "TIMEOUT");
        assert!(err.to_string().contains("POST /enroll"));
    }

    #[test]
    fn client_service_rejection_maps_to_service() {
        let err = AppError::from(TidasError::Service {
            endpoint: "POST /validate",
            status: 422,
            fault: ServiceFault {
                code: Some("NO_MATCH".into()),
                message: "payload does not match".into(),
            },
        });
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "SERVICE_ERROR");
        assert!(err.to_string().contains("NO_MATCH"));
    }

    #[test]
    fn client_config_error_maps_to_configuration() {
        let err = AppError::from(TidasError::Config(ConfigError::MissingApiKey));
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "CONFIGURATION_ERROR");
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_parse() {
        let (status, body) = response_parts(AppError::Parse("bad json".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
        assert_eq!(body.error.code, "PARSE_ERROR");
        assert!(body.error.message.contains("bad json"));
    }

    #[tokio::test]
    async fn into_response_validation() {
        let (status, body) =
            response_parts(AppError::Validation("tidasBlob is required".into())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error.code, "VALIDATION_ERROR");
        assert!(body.error.message.contains("tidasBlob"));
    }

    #[tokio::test]
    async fn into_response_timeout() {
        let (status, body) = response_parts(AppError::Timeout("after 20s".into())).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(!body.success);
        assert_eq!(body.error.code, "TIMEOUT");
        assert!(body.error.message.contains("after 20s"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) = response_parts(AppError::Internal("lock poisoned".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        // The internal error message must NOT appear in the response body.
        assert!(
            !body.error.message.contains("lock poisoned"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }
}
