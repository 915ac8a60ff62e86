//! Per-flavour mapping from canonical fields to native column names.
//!
//! Each canonical field lists its aliases highest priority first; lookups
//! stop at the first alias present with a non-null value.

use fecheck_core::PortalFlavor;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    PendingCount,
    CommerceName,
    CommerceId,
    JobName,
    JobUpdatedAt,
    JobEnabled,
    JobRaiseEvents,
    InvoiceId,
    TransactionId,
    ParkingTransactionId,
    InvoiceDate,
    NetValue,
    GrossValue,
    ThirdPartyName,
    ExitDate,
    Status,
    Cufe,
    UniqueId,
}

/// Aliases shared by every flavour for invoice and job rows.
const COMMON: &[(CanonicalField, &[&str])] = &[
    (CanonicalField::JobName, &["jobname", "nombre_job"]),
    (
        CanonicalField::JobUpdatedAt,
        &["updatedat", "ultima_actualizacion"],
    ),
    (CanonicalField::JobEnabled, &["enabled", "habilitado"]),
    (CanonicalField::JobRaiseEvents, &["raiseevents"]),
    (CanonicalField::InvoiceId, &["idinvoice", "id_invoice"]),
    (CanonicalField::TransactionId, &["idtransaction"]),
    (CanonicalField::ParkingTransactionId, &["idtransparking"]),
    (CanonicalField::InvoiceDate, &["fecha_factura", "invoicedate"]),
    (CanonicalField::NetValue, &["valor_neto_factura", "netvalue"]),
    (CanonicalField::GrossValue, &["valor_factura", "totalvalue"]),
    (CanonicalField::ThirdPartyName, &["nombretercero"]),
    (CanonicalField::ExitDate, &["outdate"]),
    (CanonicalField::Status, &["invoicestatus", "status"]),
    (CanonicalField::Cufe, &["cufe"]),
    (CanonicalField::UniqueId, &["id_unico"]),
];

const GOPASS: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::PendingCount,
        &["pending", "total_pendientes", "totalPending", "total_pending"],
    ),
    (CanonicalField::CommerceName, &["name", "comercio"]),
    // Some tenants expose the misspelt `idcomemrce` column.
    (
        CanonicalField::CommerceId,
        &["idcommerce", "idcomemrce", "id_comercio"],
    ),
];

const FACTURAPARK: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::PendingCount,
        &["total_pendientes", "pending", "totalPending"],
    ),
    (CanonicalField::CommerceName, &["comercio", "name"]),
    (CanonicalField::CommerceId, &["id_comercio", "idcommerce"]),
];

#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(CanonicalField, Vec<String>)>,
}

impl AliasTable {
    #[must_use]
    pub fn for_flavor(flavor: PortalFlavor) -> Self {
        let specific = match flavor {
            PortalFlavor::Gopass => GOPASS,
            PortalFlavor::Facturapark => FACTURAPARK,
        };
        let entries = specific
            .iter()
            .chain(COMMON)
            .map(|(field, aliases)| {
                (*field, aliases.iter().map(|a| (*a).to_string()).collect())
            })
            .collect();
        Self { entries }
    }

    /// Replaces the aliases of `field`; an empty list leaves the table as is.
    #[must_use]
    pub fn with_override(mut self, field: CanonicalField, aliases: &[String]) -> Self {
        if aliases.is_empty() {
            return self;
        }
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, existing)) => *existing = aliases.to_vec(),
            None => self.entries.push((field, aliases.to_vec())),
        }
        self
    }

    #[must_use]
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| aliases.as_slice())
            .unwrap_or_default()
    }

    /// First non-null value among `field`'s aliases in `row`.
    #[must_use]
    pub fn lookup<'a>(&self, row: &'a Map<String, Value>, field: CanonicalField) -> Option<&'a Value> {
        self.aliases(field)
            .iter()
            .find_map(|alias| row.get(alias).filter(|v| !v.is_null()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn gopass_prefers_pending_over_total_pendientes() {
        let table = AliasTable::for_flavor(PortalFlavor::Gopass);
        let r = row(json!({"total_pendientes": 9, "pending": 2}));
        assert_eq!(table.lookup(&r, CanonicalField::PendingCount), Some(&json!(2)));
    }

    #[test]
    fn facturapark_prefers_total_pendientes() {
        let table = AliasTable::for_flavor(PortalFlavor::Facturapark);
        let r = row(json!({"total_pendientes": 9, "pending": 2}));
        assert_eq!(table.lookup(&r, CanonicalField::PendingCount), Some(&json!(9)));
    }

    #[test]
    fn null_values_fall_through_to_next_alias() {
        let table = AliasTable::for_flavor(PortalFlavor::Gopass);
        let r = row(json!({"pending": null, "total_pendientes": "4"}));
        assert_eq!(
            table.lookup(&r, CanonicalField::PendingCount),
            Some(&json!("4"))
        );
    }

    #[test]
    fn misspelt_commerce_id_column_is_recognised() {
        let table = AliasTable::for_flavor(PortalFlavor::Gopass);
        let r = row(json!({"idcomemrce": 31}));
        assert_eq!(table.lookup(&r, CanonicalField::CommerceId), Some(&json!(31)));
    }

    #[test]
    fn override_replaces_aliases_in_order() {
        let table = AliasTable::for_flavor(PortalFlavor::Gopass).with_override(
            CanonicalField::PendingCount,
            &["pendientes".to_string(), "pending".to_string()],
        );
        let r = row(json!({"pending": 1, "pendientes": 5}));
        assert_eq!(table.lookup(&r, CanonicalField::PendingCount), Some(&json!(5)));
    }

    #[test]
    fn empty_override_keeps_defaults() {
        let table =
            AliasTable::for_flavor(PortalFlavor::Gopass).with_override(CanonicalField::PendingCount, &[]);
        assert_eq!(table.aliases(CanonicalField::PendingCount)[0], "pending");
    }

    #[test]
    fn missing_field_yields_none() {
        let table = AliasTable::for_flavor(PortalFlavor::Gopass);
        let r = row(json!({"other": 1}));
        assert!(table.lookup(&r, CanonicalField::Cufe).is_none());
    }
}
