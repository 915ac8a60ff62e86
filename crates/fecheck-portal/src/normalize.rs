//! Normalization from native venue rows to the canonical records in
//! [`fecheck_core::types`].
//!
//! Coercions are lenient about representation (numbers may arrive as JSON
//! numbers or strings) but never invent values: anything unparseable
//! becomes `None`.

use std::str::FromStr;

use fecheck_core::numeric::purely_numeric;
use fecheck_core::{CanonicalInvoice, InvoiceSummary, JobStatusRecord, PendingInvoiceRecord};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::aliases::{AliasTable, CanonicalField};

/// Reads a non-negative integer count from a JSON number or numeric string.
#[must_use]
pub fn value_as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= 9.0e15)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let whole = f as u64;
                    whole
                })
        }),
        Value::String(s) => purely_numeric(s),
        _ => None,
    }
}

/// Renders scalars as trimmed text; empty strings, arrays and objects are `None`.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[must_use]
pub fn value_as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

#[must_use]
pub fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "s" | "si" | "y" | "yes" => Some(true),
            "false" | "0" | "n" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[must_use]
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Rows of a list response.
///
/// Accepts `{data: {rows: [...]}}`, `{rows: [...]}`, `{data: [...]}` and a
/// bare top-level array, in that order. Non-object rows are skipped.
#[must_use]
pub fn response_rows(body: &Value) -> Vec<&Map<String, Value>> {
    let candidates = [
        body.get("data").and_then(|d| d.get("rows")),
        body.get("rows"),
        body.get("data"),
        Some(body),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_array)
        .map(|rows| rows.iter().filter_map(Value::as_object).collect())
        .unwrap_or_default()
}

/// Total item count advertised by a list response, if any.
#[must_use]
pub fn response_total_items(body: &Value) -> Option<u64> {
    body.get("data")
        .and_then(|d| d.get("totalItems"))
        .or_else(|| body.get("totalItems"))
        .and_then(value_as_count)
}

/// Pending record from the first row that exposes a pending-count alias.
///
/// Returns `None` when no row carries a structured pending field, so the
/// caller can fall back to text scanning.
#[must_use]
pub fn pending_from_rows(
    rows: &[&Map<String, Value>],
    table: &AliasTable,
    fallback_name: &str,
) -> Option<PendingInvoiceRecord> {
    rows.iter().find_map(|row| {
        let raw = table.lookup(row, CanonicalField::PendingCount)?;
        let venue_name = table
            .lookup(row, CanonicalField::CommerceName)
            .and_then(value_as_text)
            .unwrap_or_else(|| fallback_name.to_string());
        Some(PendingInvoiceRecord {
            venue_name,
            pending_count: value_as_count(raw),
            venue_identifier: table
                .lookup(row, CanonicalField::CommerceId)
                .and_then(value_as_text),
        })
    })
}

/// Job record from one row; rows without a job name are dropped.
#[must_use]
pub fn normalize_job(row: &Map<String, Value>, table: &AliasTable) -> Option<JobStatusRecord> {
    let job_name = table
        .lookup(row, CanonicalField::JobName)
        .and_then(value_as_text)?;
    Some(JobStatusRecord {
        job_name,
        last_updated: table
            .lookup(row, CanonicalField::JobUpdatedAt)
            .and_then(value_as_text),
        enabled: table
            .lookup(row, CanonicalField::JobEnabled)
            .and_then(value_as_bool),
        raise_events: table
            .lookup(row, CanonicalField::JobRaiseEvents)
            .and_then(value_as_i64),
    })
}

#[must_use]
pub fn normalize_invoice(row: &Map<String, Value>, table: &AliasTable) -> CanonicalInvoice {
    let text = |field| table.lookup(row, field).and_then(value_as_text);
    let decimal = |field| table.lookup(row, field).and_then(value_as_decimal);

    CanonicalInvoice {
        invoice_id: text(CanonicalField::InvoiceId),
        transaction_id: text(CanonicalField::TransactionId),
        parking_transaction_id: text(CanonicalField::ParkingTransactionId),
        invoice_date: text(CanonicalField::InvoiceDate),
        net_value: decimal(CanonicalField::NetValue),
        gross_value: decimal(CanonicalField::GrossValue),
        third_party_name: text(CanonicalField::ThirdPartyName),
        exit_date: text(CanonicalField::ExitDate),
        status: text(CanonicalField::Status),
        cufe: text(CanonicalField::Cufe),
        unique_id: text(CanonicalField::UniqueId),
    }
}

/// Invoice summary from a `getcustom`-style response.
///
/// The most recent invoice is the first row as ordered by the backend. When
/// `totalItems` is absent the row count stands in for the total.
#[must_use]
pub fn invoice_summary_from_body(body: &Value, table: &AliasTable) -> InvoiceSummary {
    let rows = response_rows(body);
    let total_count_for_period =
        response_total_items(body).unwrap_or_else(|| rows.len() as u64);
    InvoiceSummary {
        total_count_for_period,
        most_recent_invoice: rows.first().map(|row| normalize_invoice(row, table)),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
