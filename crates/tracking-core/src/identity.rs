//! # Domain Newtypes
//!
//! Newtype wrappers for the values that make up a tracking record. Each
//! validated type can only be built through a checking constructor, so a
//! `CountryCode` in hand is always two uppercase letters and a `Weight`
//! is always strictly positive.
//!
//! Serde goes through the same constructors (`try_from = "String"`), so
//! deserialized values are held to the same rules.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, WeightError};
use crate::validation::{check_weight, is_country_code, is_kebab_case};

/// A shipment tracking number. At most [`TrackingNumber::MAX_LEN`] characters.
///
/// Uniqueness is not a property of this type. Two generated values may be
/// equal; the persistence layer's unique key decides which one wins.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Maximum length of a tracking number, in characters.
    pub const MAX_LEN: usize = 16;

    /// Parse a tracking number received from outside (path parameter,
    /// database row).
    pub fn parse(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::InvalidTrackingNumber {
                value,
                reason: "must not be empty",
            });
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(CoreError::InvalidTrackingNumber {
                value,
                reason: "longer than 16 characters",
            });
        }
        Ok(Self(value))
    }

    /// Wrap generator output. The generator guarantees a non-empty ASCII
    /// string already truncated to `MAX_LEN`.
    pub(crate) fn from_generated(value: String) -> Self {
        debug_assert!(!value.is_empty() && value.len() <= Self::MAX_LEN);
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for TrackingNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TrackingNumber> for String {
    fn from(value: TrackingNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ISO 3166-1 alpha-2 shaped country code (`^[A-Z]{2}$`).
///
/// Only the shape is checked. `"ZZ"` is accepted even though no such
/// country exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        if is_country_code(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidCountryCode(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(value: CountryCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer slug in kebab-case: lowercase ASCII alphanumeric segments
/// separated by single hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerSlug(String);

impl CustomerSlug {
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        if is_kebab_case(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidSlug(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CustomerSlug {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerSlug> for String {
    fn from(value: CustomerSlug) -> Self {
        value.0
    }
}

impl std::fmt::Display for CustomerSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque customer identifier.
///
/// Generated fresh for every issuance. A caller-supplied customer id is
/// never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    /// Generate a new random customer identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Shipment weight. Always strictly positive.
///
/// Holds the decimal as parsed, with the scale of its literal text. The
/// persisted form is fixed-point with three decimal places; see
/// [`Weight::to_stored`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Weight(Decimal);

impl Weight {
    /// Decimal places kept by storage.
    pub const SCALE: u32 = 3;

    /// Parse weight text with the request validation rules.
    pub fn parse(value: &str) -> Result<Self, WeightError> {
        check_weight(value)
    }

    /// Wrap an already-parsed decimal, e.g. one read back from storage.
    ///
    /// Only positivity is checked; the fractional-digit rule applies to
    /// request text, not to stored values.
    pub fn from_decimal(value: Decimal) -> Result<Self, WeightError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(WeightError::OutOfRange(value.to_string()))
        }
    }

    pub(crate) fn from_parsed(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Largest value a NUMERIC(6,3) column holds.
    pub fn max_stored() -> Decimal {
        Decimal::new(999_999, Self::SCALE)
    }

    /// The value as storage keeps it: rounded half away from zero to three
    /// decimal places, scale fixed at three.
    pub fn to_stored(&self) -> Weight {
        let mut rounded = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Weight(rounded)
    }

    /// Whether [`Weight::to_stored`] fits in a NUMERIC(6,3) column.
    pub fn fits_storage(&self) -> bool {
        self.to_stored().0 <= Self::max_stored()
    }
}

impl TryFrom<String> for Weight {
    type Error = WeightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = crate::validation::parse_plain_decimal(&value)
            .ok_or_else(|| WeightError::NotANumber(value.clone()))?;
        Self::from_decimal(parsed)
    }
}

impl From<Weight> for String {
    fn from(value: Weight) -> Self {
        value.0.to_string()
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A request that passed every validation rule, in typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedShipment {
    pub origin_country_id: CountryCode,
    pub destination_country_id: CountryCode,
    pub weight: Weight,
    pub customer_name: String,
    pub customer_slug: CustomerSlug,
}
