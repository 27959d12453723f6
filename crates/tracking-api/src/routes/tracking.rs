//! # Tracking Number API
//!
//! Issues tracking numbers from shipment metadata passed as query
//! parameters, and looks up issued records.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracking_core::{IssuanceRequest, TrackingNumber};

use crate::error::AppError;
use crate::extractors::{extract_path, extract_query};
use crate::middleware::metrics::MetricsSnapshot;
use crate::orchestration::{self, IssuanceError, IssuedTrackingNumber};
use crate::state::AppState;
use crate::store::TrackingRecord;

/// Build the tracking router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/tracking-numbers/next", get(next_tracking_number))
        .route("/v1/tracking-numbers/{tracking_number}", get(get_tracking_number))
        .route("/v1/metrics", get(metrics_snapshot))
}

/// GET /v1/tracking-numbers/next: Issue a tracking number.
///
/// All shipment metadata travels in the query string. `customer_id` is
/// accepted and ignored.
#[utoipa::path(
    get,
    path = "/v1/tracking-numbers/next",
    params(
        ("origin_country_id" = Option<String>, Query, description = "ISO 3166-1 alpha-2 origin", example = "US"),
        ("destination_country_id" = Option<String>, Query, description = "ISO 3166-1 alpha-2 destination", example = "CA"),
        ("weight" = Option<String>, Query, description = "Decimal weight with at least three decimal places", example = "2.500"),
        ("customer_id" = Option<String>, Query, description = "Ignored"),
        ("customer_name" = Option<String>, Query, description = "Customer display name", example = "RedBox Logistics"),
        ("customer_slug" = Option<String>, Query, description = "Customer slug in kebab-case", example = "redbox-logistics"),
    ),
    responses(
        (status = 200, description = "Tracking number issued", body = IssuedTrackingNumber),
        (status = 422, description = "One or more fields failed validation", body = crate::error::ErrorBody),
        (status = 409, description = "Generated tracking number already issued", body = crate::error::ErrorBody),
        (status = 500, description = "Store failure", body = crate::error::ErrorBody),
    ),
    tag = "tracking"
)]
pub async fn next_tracking_number(
    State(state): State<AppState>,
    query: Result<Query<IssuanceRequest>, QueryRejection>,
) -> Result<Json<IssuedTrackingNumber>, AppError> {
    let request = extract_query(query)?;

    match orchestration::issue(&state, &request).await {
        Ok(issued) => {
            state.metrics.record_issued();
            Ok(Json(issued))
        }
        Err(err) => {
            if matches!(err, IssuanceError::Conflict(_)) {
                state.metrics.record_conflict();
            }
            Err(err.into())
        }
    }
}

/// GET /v1/tracking-numbers/{tracking_number}: Fetch an issued record.
#[utoipa::path(
    get,
    path = "/v1/tracking-numbers/{tracking_number}",
    params(("tracking_number" = String, Path, description = "Issued tracking number")),
    responses(
        (status = 200, description = "Record found", body = TrackingRecord),
        (status = 404, description = "No such tracking number", body = crate::error::ErrorBody),
    ),
    tag = "tracking"
)]
pub async fn get_tracking_number(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<TrackingRecord>, AppError> {
    let raw = extract_path(path)?;
    let not_found = || AppError::NotFound(format!("tracking number {raw} not found"));

    // Anything that cannot be a tracking number was never issued.
    let Ok(tracking_number) = TrackingNumber::parse(raw.as_str()) else {
        return Err(not_found());
    };

    state
        .tracking_numbers
        .get(&tracking_number)
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

/// GET /v1/metrics: Request and issuance counters.
#[utoipa::path(
    get,
    path = "/v1/metrics",
    responses((status = 200, description = "Counter snapshot", body = MetricsSnapshot)),
    tag = "metrics"
)]
pub async fn metrics_snapshot(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
