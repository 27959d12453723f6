//! # Tracking Record Store
//!
//! The persistence collaborator for issuance. It owns the uniqueness of
//! tracking numbers: generation makes no promise, so this is the only
//! place a duplicate is caught.
//!
//! ## Modes
//!
//! - **In-memory** (no `DATABASE_URL`): the in-memory [`Store`] is the
//!   record of truth and its atomic `insert_new` is the unique key.
//! - **PostgreSQL**: the `tracking_numbers` table is the record of truth
//!   and its UNIQUE constraint rejects duplicates. The in-memory store is
//!   a read index, hydrated on startup and written through on create.
//!
//! In both modes the column limits of the table (VARCHAR lengths,
//! NUMERIC(6,3)) are checked before anything is written, so a failed
//! create leaves nothing behind.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracking_core::{
    Clock, CountryCode, CustomerId, CustomerSlug, TrackingNumber, ValidatedShipment, Weight,
};
use utoipa::ToSchema;

use crate::state::Store;

/// Maximum length of `customer_name` and `customer_slug` columns.
pub const MAX_TEXT_COLUMN_LEN: usize = 255;

/// A persisted issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrackingRecord {
    #[schema(value_type = String, example = "TR1700000000K3ZQ")]
    pub tracking_number: TrackingNumber,
    #[serde(with = "tracking_core::temporal::iso8601")]
    #[schema(value_type = String, example = "2026-01-15T12:00:00.000000+00:00")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "US")]
    pub origin_country_id: CountryCode,
    #[schema(value_type = String, example = "CA")]
    pub destination_country_id: CountryCode,
    /// Fixed-point, three decimal places.
    #[schema(value_type = String, example = "2.500")]
    pub weight: Weight,
    #[schema(value_type = String, format = Uuid)]
    pub customer_id: CustomerId,
    pub customer_name: String,
    #[schema(value_type = String, example = "redbox-logistics")]
    pub customer_slug: CustomerSlug,
}

/// Everything needed to create a record. `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackingRecord {
    pub tracking_number: TrackingNumber,
    pub origin_country_id: CountryCode,
    pub destination_country_id: CountryCode,
    pub weight: Weight,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub customer_slug: CustomerSlug,
}

impl NewTrackingRecord {
    /// Build a record from validated input, a generated tracking number and
    /// a fresh customer id.
    pub fn from_shipment(
        tracking_number: TrackingNumber,
        shipment: ValidatedShipment,
        customer_id: CustomerId,
    ) -> Self {
        Self {
            tracking_number,
            origin_country_id: shipment.origin_country_id,
            destination_country_id: shipment.destination_country_id,
            weight: shipment.weight,
            customer_id,
            customer_name: shipment.customer_name,
            customer_slug: shipment.customer_slug,
        }
    }

    /// Check the values against the table's column limits and return the
    /// record with its weight in stored form.
    ///
    /// A weight that rounds to `0.000` is refused: the stored value must
    /// still be a valid [`Weight`] when read back.
    pub(crate) fn into_storable(mut self) -> Result<Self, StoreError> {
        if self.customer_name.chars().count() > MAX_TEXT_COLUMN_LEN {
            return Err(StoreError::ValueTooLong {
                column: "customer_name",
                max: MAX_TEXT_COLUMN_LEN,
            });
        }
        if self.customer_slug.as_str().len() > MAX_TEXT_COLUMN_LEN {
            return Err(StoreError::ValueTooLong {
                column: "customer_slug",
                max: MAX_TEXT_COLUMN_LEN,
            });
        }
        if !self.weight.fits_storage() {
            return Err(StoreError::NumericOverflow { column: "weight" });
        }
        let stored = self.weight.to_stored();
        if stored.as_decimal().is_zero() {
            return Err(StoreError::NumericUnderflow { column: "weight" });
        }
        self.weight = stored;
        Ok(self)
    }

    pub(crate) fn into_record(self, created_at: DateTime<Utc>) -> TrackingRecord {
        TrackingRecord {
            tracking_number: self.tracking_number,
            created_at,
            origin_country_id: self.origin_country_id,
            destination_country_id: self.destination_country_id,
            weight: self.weight,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_slug: self.customer_slug,
        }
    }
}

/// Store-level failure of a create.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record with this tracking number already exists.
    #[error("tracking number {tracking_number} already exists")]
    UniqueViolation { tracking_number: TrackingNumber },

    /// A text value exceeds its column width.
    #[error("value too long for column {column} (max {max} characters)")]
    ValueTooLong { column: &'static str, max: usize },

    /// A numeric value does not fit its column's precision.
    #[error("numeric field overflow in column {column}")]
    NumericOverflow { column: &'static str },

    /// A positive value rounds to zero at the column's scale.
    #[error("value in column {column} rounds to zero at storage precision")]
    NumericUnderflow { column: &'static str },

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Issued tracking records, unique on tracking number.
#[derive(Clone)]
pub struct TrackingStore {
    records: Store<TrackingNumber, TrackingRecord>,
    clock: Arc<dyn Clock>,
    db_pool: Option<PgPool>,
}

impl std::fmt::Debug for TrackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingStore")
            .field("records", &self.records.len())
            .field("database", &self.db_pool.is_some())
            .finish()
    }
}

impl TrackingStore {
    pub fn new(clock: Arc<dyn Clock>, db_pool: Option<PgPool>) -> Self {
        Self {
            records: Store::new(),
            clock,
            db_pool,
        }
    }

    /// Whether this store runs without a database.
    pub fn is_in_memory(&self) -> bool {
        self.db_pool.is_none()
    }

    /// Create one record.
    ///
    /// Fails with [`StoreError::UniqueViolation`] if the tracking number is
    /// taken. Nothing is written on any failure.
    pub async fn create_record(&self, new: NewTrackingRecord) -> Result<TrackingRecord, StoreError> {
        let new = new.into_storable()?;

        match &self.db_pool {
            Some(pool) => {
                let created_at = crate::db::tracking_numbers::insert(pool, &new).await?;
                let record = new.into_record(created_at);
                self.records
                    .insert(record.tracking_number.clone(), record.clone());
                Ok(record)
            }
            None => {
                let record = new.into_record(self.clock.now());
                self.records
                    .insert_new(record.tracking_number.clone(), record.clone())
                    .map_err(|rejected| StoreError::UniqueViolation {
                        tracking_number: rejected.tracking_number,
                    })?;
                Ok(record)
            }
        }
    }

    /// Fetch a record by tracking number.
    ///
    /// Reads the in-memory index first and falls back to the database, so
    /// records written by other instances are still found.
    pub async fn get(&self, tracking_number: &TrackingNumber) -> Result<Option<TrackingRecord>, StoreError> {
        if let Some(record) = self.records.get(tracking_number) {
            return Ok(Some(record));
        }
        let Some(pool) = &self.db_pool else {
            return Ok(None);
        };
        let record = crate::db::tracking_numbers::get_by_tracking_number(pool, tracking_number).await?;
        if let Some(record) = &record {
            self.records
                .insert(record.tracking_number.clone(), record.clone());
        }
        Ok(record)
    }

    /// Load every persisted record into the in-memory index.
    ///
    /// Returns `None` without a database, otherwise the number of rows loaded.
    pub async fn hydrate(&self) -> Result<Option<usize>, StoreError> {
        let Some(pool) = &self.db_pool else {
            return Ok(None);
        };
        let rows = crate::db::tracking_numbers::load_all(pool).await?;
        let count = rows.len();
        for record in rows {
            self.records
                .insert(record.tracking_number.clone(), record);
        }
        Ok(Some(count))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
