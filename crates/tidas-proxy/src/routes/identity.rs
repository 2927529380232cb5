//! # Identity Proxy Routes
//!
//! Thin passthrough layer that forwards identity operations to the hosted
//! Tidas service via `tidas-client`. The proxy owns request parsing,
//! validation, and error mapping; the identity payload itself is opaque and
//! reaches the provider exactly as the caller sent it.
//!
//! | Method | Path                  | Upstream call   |
//! |--------|-----------------------|-----------------|
//! | GET    | `/tidas_ping`         | `GET /ping`     |
//! | POST   | `/process_enrollment` | `POST /enroll`  |
//! | POST   | `/process_validation` | `POST /validate`|
//!
//! ## Request body
//!
//! Both POST endpoints accept the same envelope:
//!
//! ```json
//! { "tidasBlob": <any JSON>, "tidas_id": "optional string" }
//! ```
//!
//! `tidas_id` is required for validation, optional for enrollment (the
//! provider assigns one when absent). Malformed JSON is a 400 parse error;
//! well-formed JSON missing a required field is a 422 validation error.
//! Either way the request is rejected before any upstream call is made.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tidas_client::{EnrollOptions, IdentityResult, TidasClient};

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::state::AppState;

/// Build the identity proxy router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tidas_ping", get(tidas_ping))
        .route("/process_enrollment", post(process_enrollment))
        .route("/process_validation", post(process_validation))
}

/// Helper: snapshot the Tidas client from AppState or return 503.
fn require_client(state: &AppState) -> Result<TidasClient, AppError> {
    state.identity_client().ok_or_else(|| {
        AppError::Configuration(
            "identity client not configured. Set TIDAS_API_KEY and TIDAS_APPLICATION.".to_string(),
        )
    })
}

// -- Request envelope ---------------------------------------------------------

/// Parsed form of the inbound enrollment/validation body.
///
/// Fields are pulled out of a `serde_json::Value` by hand instead of a
/// derived `Deserialize` so that a missing or mistyped field surfaces as a
/// 422 validation error, distinct from the 400 parse error a syntactically
/// broken body produces.
#[derive(Debug)]
struct ProxyEnvelope {
    /// Opaque identity payload, forwarded verbatim.
    blob: Value,
    /// Identity record identifier. `null` is treated as absent.
    tidas_id: Option<String>,
}

impl ProxyEnvelope {
    fn from_body(body: Value) -> Result<Self, AppError> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Err(AppError::Validation(format!(
                    "request body must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        let blob = fields
            .remove("tidasBlob")
            .ok_or_else(|| AppError::Validation("missing required field: tidasBlob".to_string()))?;

        let tidas_id = match fields.remove("tidas_id") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id),
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "tidas_id must be a string, got {}",
                    json_type_name(&other)
                )))
            }
        };

        Ok(Self { blob, tidas_id })
    }

    /// The identifier, required and non-empty (validation flow).
    fn require_tidas_id(&self) -> Result<&str, AppError> {
        match self.tidas_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            Some(_) => Err(AppError::Validation(
                "tidas_id must be non-empty".to_string(),
            )),
            None => Err(AppError::Validation(
                "missing required field: tidas_id".to_string(),
            )),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── HANDLERS ────────────────────────────────────────────────────────

/// GET /tidas_ping — Health-check the upstream Tidas service.
#[utoipa::path(
    get,
    path = "/tidas_ping",
    responses(
        (status = 200, description = "Tidas service reachable; provider result forwarded"),
        (status = 502, description = "Transport failure or unusable upstream response"),
        (status = 503, description = "Identity client not configured"),
        (status = 504, description = "Upstream call exceeded its deadline"),
    ),
    tag = "identity"
)]
async fn tidas_ping(State(state): State<AppState>) -> Result<Json<IdentityResult>, AppError> {
    let client = require_client(&state)?;
    let result = client.ping().await?;
    Ok(Json(result))
}

/// POST /process_enrollment — Enroll an identity payload with Tidas.
///
/// `tidas_id` is optional: when absent the provider assigns one and the
/// response echoes the effective identifier.
#[utoipa::path(
    post,
    path = "/process_enrollment",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Enrollment processed; provider result forwarded"),
        (status = 400, description = "Request body is not valid JSON"),
        (status = 422, description = "Missing/invalid fields, or the provider rejected the call"),
        (status = 502, description = "Transport failure or unusable upstream response"),
        (status = 503, description = "Identity client not configured"),
        (status = 504, description = "Upstream call exceeded its deadline"),
    ),
    tag = "identity"
)]
async fn process_enrollment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IdentityResult>, AppError> {
    // Parse and validate before touching the client: a bad request must
    // never produce an upstream call.
    let envelope = ProxyEnvelope::from_body(extract_json(body)?)?;
    let client = require_client(&state)?;

    let options = EnrollOptions {
        tidas_id: envelope.tidas_id,
    };
    let result = client.enroll(&envelope.blob, &options).await?;
    Ok(Json(result))
}

/// POST /process_validation — Validate an identity payload against an
/// enrolled identity.
///
/// `tidas_id` is required. A mismatch is a 200 response with
/// `"success": false`, not an error status.
#[utoipa::path(
    post,
    path = "/process_validation",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Validation processed; provider verdict forwarded"),
        (status = 400, description = "Request body is not valid JSON"),
        (status = 422, description = "Missing/invalid fields, or the provider rejected the call"),
        (status = 502, description = "Transport failure or unusable upstream response"),
        (status = 503, description = "Identity client not configured"),
        (status = 504, description = "Upstream call exceeded its deadline"),
    ),
    tag = "identity"
)]
async fn process_validation(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IdentityResult>, AppError> {
    let envelope = ProxyEnvelope::from_body(extract_json(body)?)?;
    let tidas_id = envelope.require_tidas_id()?;
    let client = require_client(&state)?;

    let result = client.validate(&envelope.blob, tidas_id).await?;
    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
