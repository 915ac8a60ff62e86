//! Per-venue detail view for the `venues` command.

use std::fmt::Write as _;

use fecheck_core::{CanonicalInvoice, JobColumns, JobStatusRecord, VenueConfig};
use fecheck_portal::VenueOutcome;

use crate::format::{job_timestamp, login_failure, NO_DATE};

const BASIC_HEADERS: [&str; 2] = ["JOB", "ÚLTIMA ACTUALIZACIÓN"];
const EXTENDED_HEADERS: [&str; 4] = [
    "NOMBRE",
    "AUMENTO DE EVENTOS",
    "HABILITADO",
    "FECHA DE ACTUALIZACIÓN",
];

fn yes_no(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Sí",
        Some(false) => "No",
        None => "-",
    }
}

/// Jobs as a text table; extended venues get relabelled extra columns.
pub(crate) fn jobs_table(jobs: &[JobStatusRecord], columns: JobColumns, offset_hours: i32) -> String {
    let headers: Vec<&str> = match columns {
        JobColumns::Basic => BASIC_HEADERS.to_vec(),
        JobColumns::Extended => EXTENDED_HEADERS.to_vec(),
    };
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|job| {
            let updated = job
                .last_updated
                .as_deref()
                .map_or_else(|| NO_DATE.to_string(), |raw| job_timestamp(raw, offset_hours));
            match columns {
                JobColumns::Basic => vec![job.job_name.clone(), updated],
                JobColumns::Extended => vec![
                    job.job_name.clone(),
                    job.raise_events.map_or_else(|| "-".to_string(), |n| n.to_string()),
                    yes_no(job.enabled).to_string(),
                    updated,
                ],
            }
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header_cells: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    let mut out = render(&header_cells);
    for row in &rows {
        out.push('\n');
        out.push_str(&render(row));
    }
    out
}

fn invoice_block(invoice: &CanonicalInvoice) -> String {
    let fields: [(&str, Option<String>); 11] = [
        ("idinvoice", invoice.invoice_id.clone()),
        ("idtransaction", invoice.transaction_id.clone()),
        ("idtransparking", invoice.parking_transaction_id.clone()),
        ("fecha_factura", invoice.invoice_date.clone()),
        ("valor_neto_factura", invoice.net_value.map(|v| v.to_string())),
        ("valor_factura", invoice.gross_value.map(|v| v.to_string())),
        ("nombretercero", invoice.third_party_name.clone()),
        ("outdate", invoice.exit_date.clone()),
        ("invoicestatus", invoice.status.clone()),
        ("cufe", invoice.cufe.clone()),
        ("id_unico", invoice.unique_id.clone()),
    ];
    let mut out = String::new();
    for (name, value) in fields {
        let _ = writeln!(out, "  {name:<20}{}", value.as_deref().unwrap_or("-"));
    }
    out
}

/// Full detail block for one venue.
pub(crate) fn venue_detail(venue: &VenueConfig, outcome: &VenueOutcome, offset_hours: i32) -> String {
    let mut out = format!("== {} ({}) ==\n", venue.display_name, venue.key);
    match outcome {
        VenueOutcome::LoginFailed { reason } => {
            let _ = writeln!(out, "Inicio de sesión fallido: {}", login_failure(reason));
        }
        VenueOutcome::Collected {
            pending,
            jobs,
            invoices,
        } => {
            let count = pending
                .pending_count
                .map_or_else(|| "no disponible".to_string(), |n| n.to_string());
            let _ = writeln!(out, "Pendientes por emitir ({}): {count}", pending.venue_name);

            out.push_str("\nJobs:\n");
            if jobs.is_empty() {
                out.push_str("  (sin jobs)\n");
            } else {
                out.push_str(&jobs_table(jobs, venue.job_columns, offset_hours));
                out.push('\n');
            }

            let _ = writeln!(
                out,
                "\nFacturas del día: {}",
                invoices.total_count_for_period
            );
            match &invoices.most_recent_invoice {
                Some(invoice) => {
                    out.push_str("Última factura:\n");
                    out.push_str(&invoice_block(invoice));
                }
                None => out.push_str("Última factura: ninguna\n"),
            }
        }
    }
    out
}

/// One catalogue line for `venues --list`.
pub(crate) fn catalogue_line(venue: &VenueConfig, has_credentials: bool) -> String {
    format!(
        "{:<10} {:<18} {:<12} {} [credenciales: {}]",
        venue.key,
        venue.display_name,
        venue.flavor,
        venue.base_url,
        if has_credentials { "sí" } else { "no" }
    )
}
