//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec.
//! Serves at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tidas Identity Proxy",
        version = "0.2.3",
        description = "HTTP proxy in front of the hosted Tidas passwordless-identity service: enrollment, validation, and upstream health checks with a uniform error contract.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::identity::tidas_ping,
        crate::routes::identity::process_enrollment,
        crate::routes::identity::process_validation,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "identity", description = "Tidas enrollment, validation, and upstream health"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_documents_all_identity_paths() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/tidas_ping"));
        assert!(paths.iter().any(|p| p.as_str() == "/process_enrollment"));
        assert!(paths.iter().any(|p| p.as_str() == "/process_validation"));
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "Tidas Identity Proxy");
        assert!(json["components"]["schemas"]["ErrorBody"].is_object());
    }
}
