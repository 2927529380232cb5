//! # Body Extraction
//!
//! Maps Axum JSON extraction failures to the [`AppError`] taxonomy before
//! any field-level validation runs. Handlers take the body as
//! `Result<Json<T>, JsonRejection>` so a malformed request reaches them as
//! a value instead of short-circuiting with Axum's default 422 response.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping any rejection to [`AppError::Parse`].
///
/// Covers syntactically invalid JSON, a missing or non-JSON content type,
/// and unreadable bodies. Field-level problems inside well-formed JSON are
/// the handler's job and map to [`AppError::Validation`] instead.
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., AppError> {
///     let req = extract_json(body)?;
///     // use req...
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::Parse(err.body_text()))
}
