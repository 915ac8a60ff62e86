//! Canonical records every venue adapter normalises into.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Login credential for one venue. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

impl Credential {
    #[must_use]
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Pending (not yet emitted) invoices for one venue.
///
/// `pending_count` is `None` when no source yielded a parseable count; it is
/// never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInvoiceRecord {
    pub venue_name: String,
    pub pending_count: Option<u64>,
    pub venue_identifier: Option<String>,
}

impl PendingInvoiceRecord {
    /// Record for a venue whose pending count could not be determined.
    #[must_use]
    pub fn unavailable(venue_name: &str) -> Self {
        Self {
            venue_name: venue_name.to_string(),
            pending_count: None,
            venue_identifier: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusRecord {
    pub job_name: String,
    /// Timestamp exactly as the backend reported it.
    pub last_updated: Option<String>,
    pub enabled: Option<bool>,
    pub raise_events: Option<i64>,
}

/// Venue-agnostic invoice row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalInvoice {
    pub invoice_id: Option<String>,
    pub transaction_id: Option<String>,
    pub parking_transaction_id: Option<String>,
    pub invoice_date: Option<String>,
    pub net_value: Option<Decimal>,
    pub gross_value: Option<Decimal>,
    pub third_party_name: Option<String>,
    pub exit_date: Option<String>,
    pub status: Option<String>,
    /// Tax-authority validation code.
    pub cufe: Option<String>,
    pub unique_id: Option<String>,
}

/// Invoices issued during the current business day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub total_count_for_period: u64,
    pub most_recent_invoice: Option<CanonicalInvoice>,
}
