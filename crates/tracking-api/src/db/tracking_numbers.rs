//! Tracking number persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `tracking_numbers` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracking_core::{CountryCode, CustomerId, CustomerSlug, TrackingNumber, Weight};
use uuid::Uuid;

use crate::store::{NewTrackingRecord, StoreError, TrackingRecord};

/// Insert a new record and return the database-assigned `created_at`.
///
/// A UNIQUE violation on `tracking_number` maps to
/// [`StoreError::UniqueViolation`]; every other failure to
/// [`StoreError::Database`].
pub async fn insert(pool: &PgPool, record: &NewTrackingRecord) -> Result<DateTime<Utc>, StoreError> {
    sqlx::query_scalar::<_, DateTime<Utc>>(
        "INSERT INTO tracking_numbers (tracking_number, origin_country_id,
         destination_country_id, weight, customer_id, customer_name, customer_slug)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING created_at",
    )
    .bind(record.tracking_number.as_str())
    .bind(record.origin_country_id.as_str())
    .bind(record.destination_country_id.as_str())
    .bind(record.weight.as_decimal())
    .bind(*record.customer_id.as_uuid())
    .bind(&record.customer_name)
    .bind(record.customer_slug.as_str())
    .fetch_one(pool)
    .await
    .map_err(|err| classify_insert_error(err, &record.tracking_number))
}

/// Fetch a record by tracking number.
pub async fn get_by_tracking_number(
    pool: &PgPool,
    tracking_number: &TrackingNumber,
) -> Result<Option<TrackingRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, TrackingRow>(
        "SELECT tracking_number, created_at, origin_country_id, destination_country_id,
         weight, customer_id, customer_name, customer_slug
         FROM tracking_numbers WHERE tracking_number = $1",
    )
    .bind(tracking_number.as_str())
    .fetch_optional(pool)
    .await?;

    row.map(TrackingRow::into_record).transpose()
}

/// Load all records from the database into the in-memory store on startup.
///
/// Rows that do not decode into a valid record are logged and skipped.
pub async fn load_all(pool: &PgPool) -> Result<Vec<TrackingRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TrackingRow>(
        "SELECT tracking_number, created_at, origin_country_id, destination_country_id,
         weight, customer_id, customer_name, customer_slug
         FROM tracking_numbers ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(decode_rows(rows))
}

fn decode_rows(rows: Vec<TrackingRow>) -> Vec<TrackingRecord> {
    rows.into_iter()
        .filter_map(|row| {
            let tracking_number = row.tracking_number.clone();
            match row.into_record() {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        tracking_number = %tracking_number,
                        error = %err,
                        "skipping undecodable tracking row"
                    );
                    None
                }
            }
        })
        .collect()
}

fn classify_insert_error(err: sqlx::Error, tracking_number: &TrackingNumber) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation {
                tracking_number: tracking_number.clone(),
            };
        }
    }
    StoreError::Database(err)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct TrackingRow {
    tracking_number: String,
    created_at: DateTime<Utc>,
    origin_country_id: String,
    destination_country_id: String,
    weight: Decimal,
    customer_id: Uuid,
    customer_name: String,
    customer_slug: String,
}

impl TrackingRow {
    /// Rebuild the typed record. A row that violates a domain rule is
    /// reported as a decode error rather than silently patched.
    fn into_record(self) -> Result<TrackingRecord, sqlx::Error> {
        Ok(TrackingRecord {
            tracking_number: TrackingNumber::parse(self.tracking_number).map_err(decode)?,
            created_at: self.created_at,
            origin_country_id: CountryCode::parse(&self.origin_country_id).map_err(decode)?,
            destination_country_id: CountryCode::parse(&self.destination_country_id)
                .map_err(decode)?,
            weight: Weight::from_decimal(self.weight).map_err(decode)?,
            customer_id: CustomerId(self.customer_id),
            customer_name: self.customer_name,
            customer_slug: CustomerSlug::parse(&self.customer_slug).map_err(decode)?,
        })
    }
}

fn decode<E: std::error::Error + Send + Sync + 'static>(err: E) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}
