//! # Issuance Orchestration
//!
//! The Issue operation as a straight-line pipeline:
//!
//! ```text
//! IssuanceRequest → validate → generate → create_record → IssuedTrackingNumber
//! ```
//!
//! Validation failures stop the pipeline before anything is generated.
//! A store failure after generation discards the generated number; there
//! is no retry and no compensating action. A unique-key conflict is
//! reported to the caller as a failed issuance.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracking_core::temporal::to_iso8601;
use tracking_core::validation::validate_into;
use tracking_core::{CustomerId, IssuanceRequest, TrackingNumber, ValidationErrors};
use utoipa::ToSchema;

use crate::state::AppState;
use crate::store::{NewTrackingRecord, StoreError, TrackingRecord};

/// Successful issuance as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IssuedTrackingNumber {
    /// At most 16 characters, starting with `TR`.
    #[schema(example = "TR1700000000K3ZQ")]
    pub tracking_number: String,
    /// ISO-8601 creation timestamp.
    #[schema(example = "2026-01-15T12:00:00.000000+00:00")]
    pub created_at: String,
}

impl From<&TrackingRecord> for IssuedTrackingNumber {
    fn from(record: &TrackingRecord) -> Self {
        Self {
            tracking_number: record.tracking_number.to_string(),
            created_at: to_iso8601(&record.created_at),
        }
    }
}

/// Why an issuance did not happen.
#[derive(Error, Debug)]
pub enum IssuanceError {
    /// One or more fields failed validation.
    #[error("invalid request: {0}")]
    Invalid(ValidationErrors),

    /// The generated tracking number was already taken.
    #[error("tracking number {0} already issued")]
    Conflict(TrackingNumber),

    /// The store failed for another reason.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for IssuanceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { tracking_number } => Self::Conflict(tracking_number),
            other => Self::Store(other),
        }
    }
}

/// Validate the request, generate a tracking number, and persist one record.
pub async fn issue(
    state: &AppState,
    request: &IssuanceRequest,
) -> Result<IssuedTrackingNumber, IssuanceError> {
    issue_record(state, request)
        .await
        .map(|record| IssuedTrackingNumber::from(&record))
}

/// Like [`issue`], but returns the full persisted record.
///
/// The record's customer id is always freshly generated; any
/// `customer_id` in the request is ignored.
pub async fn issue_record(
    state: &AppState,
    request: &IssuanceRequest,
) -> Result<TrackingRecord, IssuanceError> {
    let shipment = validate_into(request).map_err(|errors| {
        tracing::info!(
            failing_fields = ?errors.fields().map(|f| f.as_str()).collect::<Vec<_>>(),
            "issuance rejected by validation"
        );
        IssuanceError::Invalid(errors)
    })?;

    let tracking_number = state.generator.generate();
    let new = NewTrackingRecord::from_shipment(tracking_number.clone(), shipment, CustomerId::new());

    let record = state
        .tracking_numbers
        .create_record(new)
        .await
        .map_err(|err| {
            let err = IssuanceError::from(err);
            match &err {
                IssuanceError::Conflict(_) => tracing::warn!(
                    tracking_number = %tracking_number,
                    "generated tracking number collided with an existing record"
                ),
                _ => tracing::error!(
                    tracking_number = %tracking_number,
                    error = %err,
                    "failed to persist tracking record"
                ),
            }
            err
        })?;

    tracing::info!(
        tracking_number = %record.tracking_number,
        origin = %record.origin_country_id,
        destination = %record.destination_country_id,
        "tracking number issued"
    );

    Ok(record)
}
