//! # Request Validation
//!
//! Checks the five fields of an [`IssuanceRequest`] and reports every
//! failing field at once, as a mapping from field name to a human-readable
//! message. An empty mapping means the request is acceptable.
//!
//! ## Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | `origin_country_id` | exactly two uppercase ASCII letters |
//! | `destination_country_id` | exactly two uppercase ASCII letters |
//! | `weight` | decimal number, strictly positive, at least 3 fractional digits as typed |
//! | `customer_name` | non-empty |
//! | `customer_slug` | kebab-case |
//!
//! Rules are independent. None of them short-circuits another.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WeightError;
use crate::identity::{CountryCode, CustomerSlug, ValidatedShipment, Weight};
use crate::request::IssuanceRequest;

static COUNTRY_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("Invalid country code regex pattern"));

pub const ORIGIN_COUNTRY_MESSAGE: &str =
    "Origin country code must be in ISO 3166-1 alpha-2 format (e.g., 'US').";
pub const DESTINATION_COUNTRY_MESSAGE: &str =
    "Destination country code must be in ISO 3166-1 alpha-2 format (e.g., 'CA').";
pub const WEIGHT_NOT_A_NUMBER_MESSAGE: &str = "Weight must be a valid decimal number.";
pub const WEIGHT_OUT_OF_RANGE_MESSAGE: &str =
    "Weight must be a positive decimal number up to three decimal places.";
pub const CUSTOMER_NAME_MESSAGE: &str = "Customer name cannot be empty.";
pub const CUSTOMER_SLUG_MESSAGE: &str =
    "Customer slug must be in slug/kebab-case format (e.g., 'customer-slug').";

/// Minimum number of digits the weight text must carry after the point.
///
/// This reads like an inverted "at most three decimal places" rule (the
/// message even says "up to"), but issued numbers depend on the current
/// behavior, so it is kept as a minimum.
pub const MIN_WEIGHT_FRACTION_DIGITS: usize = 3;

/// A validated request field. Serializes as its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    OriginCountryId,
    DestinationCountryId,
    Weight,
    CustomerName,
    CustomerSlug,
}

impl Field {
    /// All validated fields, in wire order.
    pub const ALL: [Field; 5] = [
        Field::OriginCountryId,
        Field::DestinationCountryId,
        Field::Weight,
        Field::CustomerName,
        Field::CustomerSlug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OriginCountryId => "origin_country_id",
            Self::DestinationCountryId => "destination_country_id",
            Self::Weight => "weight",
            Self::CustomerName => "customer_name",
            Self::CustomerSlug => "customer_slug",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → error message, one entry per failing field.
///
/// Serializes as a flat JSON object, e.g.
/// `{"weight": "Weight must be a valid decimal number."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`, replacing any earlier message.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failing fields, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Whether `value` is exactly two uppercase ASCII letters.
pub fn is_country_code(value: &str) -> bool {
    COUNTRY_CODE_PATTERN.is_match(value)
}

/// Whether an optional text field carries at least one character.
pub fn is_non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Whether `value` is kebab-case.
///
/// Split on `-`; every segment must be non-empty and consist only of
/// lowercase ASCII letters and digits. The empty string fails.
pub fn is_kebab_case(value: &str) -> bool {
    !value.is_empty()
        && value.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// Number of characters after the decimal point in the literal text.
/// Text without a point has none, so whole numbers such as `"100"` never
/// satisfy the minimum. Counting the whole text in that case would accept
/// them; that reading is deliberately not followed.
pub fn fraction_digits(value: &str) -> usize {
    value
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.chars().count())
}

/// Check weight text.
///
/// Parse failure yields [`WeightError::NotANumber`]. A parsed value that is
/// zero or negative, or whose text has fewer than
/// [`MIN_WEIGHT_FRACTION_DIGITS`] fractional digits, yields
/// [`WeightError::OutOfRange`].
pub fn check_weight(value: &str) -> Result<Weight, WeightError> {
    let parsed =
        parse_plain_decimal(value).ok_or_else(|| WeightError::NotANumber(value.to_string()))?;

    if parsed <= Decimal::ZERO || fraction_digits(value) < MIN_WEIGHT_FRACTION_DIGITS {
        return Err(WeightError::OutOfRange(value.to_string()));
    }

    Ok(Weight::from_parsed(parsed))
}

/// Parse plain decimal notation. Exponent forms (`1.5e3`) are not numbers
/// here, although `Decimal::from_str` would take them.
pub(crate) fn parse_plain_decimal(value: &str) -> Option<Decimal> {
    if value.contains(['e', 'E']) {
        return None;
    }
    value.parse().ok()
}

/// Message reported for a weight failure.
pub fn weight_message(err: &WeightError) -> &'static str {
    match err {
        WeightError::NotANumber(_) => WEIGHT_NOT_A_NUMBER_MESSAGE,
        WeightError::OutOfRange(_) => WEIGHT_OUT_OF_RANGE_MESSAGE,
    }
}

/// Validate a request, collecting a message for every failing field.
pub fn validate(request: &IssuanceRequest) -> ValidationErrors {
    validate_into(request).err().unwrap_or_default()
}

/// Validate a request and, if every rule passes, return its typed form.
pub fn validate_into(request: &IssuanceRequest) -> Result<ValidatedShipment, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let origin = request
        .origin()
        .and_then(|v| CountryCode::parse(v).ok());
    if origin.is_none() {
        errors.insert(Field::OriginCountryId, ORIGIN_COUNTRY_MESSAGE);
    }

    let destination = request
        .destination()
        .and_then(|v| CountryCode::parse(v).ok());
    if destination.is_none() {
        errors.insert(Field::DestinationCountryId, DESTINATION_COUNTRY_MESSAGE);
    }

    // An absent weight is "not a number", not "out of range".
    let weight = match request.weight() {
        Some(text) => check_weight(text),
        None => Err(WeightError::NotANumber(String::new())),
    };
    let weight = match weight {
        Ok(w) => Some(w),
        Err(err) => {
            errors.insert(Field::Weight, weight_message(&err));
            None
        }
    };

    let customer_name = request
        .customer_name()
        .filter(|v| is_non_empty(Some(*v)));
    if customer_name.is_none() {
        errors.insert(Field::CustomerName, CUSTOMER_NAME_MESSAGE);
    }

    let customer_slug = request
        .customer_slug()
        .and_then(|v| CustomerSlug::parse(v).ok());
    if customer_slug.is_none() {
        errors.insert(Field::CustomerSlug, CUSTOMER_SLUG_MESSAGE);
    }

    match (origin, destination, weight, customer_name, customer_slug) {
        (Some(origin), Some(destination), Some(weight), Some(name), Some(slug))
            if errors.is_empty() =>
        {
            Ok(ValidatedShipment {
                origin_country_id: origin,
                destination_country_id: destination,
                weight,
                customer_name: name.to_string(),
                customer_slug: slug,
            })
        }
        _ => Err(errors),
    }
}
