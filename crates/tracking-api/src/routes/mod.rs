//! # API Route Modules
//!
//! - `tracking`: tracking number issuance and lookup, plus the metrics
//!   snapshot.

pub mod tracking;
