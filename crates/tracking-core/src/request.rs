//! # Issuance Request
//!
//! The transient input to one issuance call. Every member is optional at
//! the transport boundary; the validator decides what is acceptable.

use serde::{Deserialize, Serialize};

/// Raw shipment metadata as received from a caller.
///
/// Values are kept exactly as typed. `None` means the field was absent,
/// `Some("")` means it was present but empty; the validation rules treat
/// both as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest {
    /// Two-letter origin country code, e.g. `"US"`.
    #[serde(default)]
    pub origin_country_id: Option<String>,
    /// Two-letter destination country code, e.g. `"CA"`.
    #[serde(default)]
    pub destination_country_id: Option<String>,
    /// Weight as decimal text, e.g. `"2.500"`.
    #[serde(default)]
    pub weight: Option<String>,
    /// Accepted for compatibility and ignored. A fresh customer id is
    /// always generated at issuance.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Customer display name.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Customer slug in kebab-case, e.g. `"acme-logistics"`.
    #[serde(default)]
    pub customer_slug: Option<String>,
}

impl IssuanceRequest {
    /// Origin country code, absent treated as `None`.
    pub fn origin(&self) -> Option<&str> {
        self.origin_country_id.as_deref()
    }

    /// Destination country code, absent treated as `None`.
    pub fn destination(&self) -> Option<&str> {
        self.destination_country_id.as_deref()
    }

    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn customer_slug(&self) -> Option<&str> {
        self.customer_slug.as_deref()
    }
}
