//! # Error Types
//!
//! Errors raised when constructing domain values directly. Request-level
//! validation does not use these; it collects per-field messages into
//! [`ValidationErrors`](crate::validation::ValidationErrors) instead.

use thiserror::Error;

/// Error constructing a validated domain value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Tracking number is empty or longer than 16 characters.
    #[error("invalid tracking number {value:?}: {reason}")]
    InvalidTrackingNumber {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Country code is not two uppercase ASCII letters.
    #[error("invalid country code {0:?}: expected two uppercase letters")]
    InvalidCountryCode(String),

    /// Slug is not kebab-case.
    #[error("invalid customer slug {0:?}: expected lowercase alphanumeric segments joined by '-'")]
    InvalidSlug(String),

    /// Weight failed to parse or violated its range rule.
    #[error("invalid weight: {0}")]
    InvalidWeight(#[from] WeightError),
}

/// Outcome of a failed weight check.
///
/// The two variants are reported with different messages so callers can
/// tell "not a number" apart from "wrong sign or precision".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightError {
    /// The text is not a decimal number.
    #[error("{0:?} is not a decimal number")]
    NotANumber(String),

    /// The number is not strictly positive, or its literal text has fewer
    /// than three fractional digits.
    #[error("{0:?} must be positive with at least three fractional digits")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_error_converts_into_core_error() {
        let err: CoreError = WeightError::NotANumber("abc".into()).into();
        assert!(matches!(err, CoreError::InvalidWeight(WeightError::NotANumber(_))));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn tracking_number_error_mentions_value_and_reason() {
        let err = CoreError::InvalidTrackingNumber {
            value: "X".repeat(17),
            reason: "longer than 16 characters",
        };
        let msg = err.to_string();
        assert!(msg.contains("XXXXXXXXXXXXXXXXX"));
        assert!(msg.contains("16 characters"));
    }
}
