//! # tracking-core: Foundational Types for Tracking Number Issuance
//!
//! This crate holds the only parts of the issuance service with design
//! substance: the field validator and the tracking number generator. It
//! depends on nothing internal and knows nothing about HTTP or databases.
//!
//! ## Pipeline
//!
//! ```text
//! IssuanceRequest ──▶ validation::validate ──▶ ValidationErrors (non-empty → reject)
//!                               │
//!                               ▼
//!                       ValidatedShipment ──▶ TrackingNumberGenerator::generate
//! ```
//!
//! Persisting the result is the caller's concern; see `tracking-api`.
//!
//! ## Key Design Principles
//!
//! 1. **Structured input.** [`IssuanceRequest`] names every field and keeps
//!    each one independently optional, so "missing", "empty" and "invalid"
//!    stay distinguishable.
//!
//! 2. **All errors at once.** [`validation::validate`] evaluates every rule
//!    and reports one message per failing field.
//!
//! 3. **Injected capabilities.** The generator takes a [`Clock`] and an RNG,
//!    so tests can pin both and assert exact output.
//!
//! 4. **Generation is not uniqueness.** Generated numbers can collide; the
//!    store's unique key is what guarantees no duplicates are persisted.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tracking-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod generator;
pub mod identity;
pub mod request;
pub mod temporal;
pub mod validation;

pub use error::{CoreError, WeightError};
pub use generator::{TimestampGenerator, TrackingNumberGenerator, TRACKING_PREFIX};
pub use identity::{CountryCode, CustomerId, CustomerSlug, TrackingNumber, ValidatedShipment, Weight};
pub use request::IssuanceRequest;
pub use temporal::{Clock, FixedClock, SystemClock};
pub use validation::{Field, ValidationErrors};
