//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tracking Number API",
        version = "0.1.0",
        description = "Issues unique shipment tracking numbers from validated shipment metadata.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        crate::routes::tracking::next_tracking_number,
        crate::routes::tracking::get_tracking_number,
        crate::routes::tracking::metrics_snapshot,
    ),
    components(schemas(
        crate::orchestration::IssuedTrackingNumber,
        crate::store::TrackingRecord,
        crate::middleware::metrics::MetricsSnapshot,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "tracking", description = "Tracking number issuance and lookup"),
        (name = "metrics", description = "In-process counters"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
