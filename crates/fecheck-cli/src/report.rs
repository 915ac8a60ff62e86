//! Composes the daily electronic-invoicing status message.
//!
//! Pure function of the run results and the dashboard snapshot; venues are
//! listed in catalogue order regardless of completion order.

use std::fmt::Write as _;

use fecheck_core::{JobStatusRecord, PendingInvoiceRecord, VenueConfig};
use fecheck_dashboard::{DashboardSnapshot, MetricReading, PARKING_LABEL, TOLL_LABEL};
use fecheck_portal::{RunResults, VenueOutcome};
use thiserror::Error;

use crate::format::{job_timestamp, login_failure, NO_DATE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("dashboard count for {0} is unavailable; report not composed")]
    MissingAggregate(&'static str),
}

pub struct ReportInput<'a> {
    pub venues: &'a [VenueConfig],
    pub results: &'a RunResults,
    /// `None` when the dashboard was deliberately skipped.
    pub snapshot: Option<&'a DashboardSnapshot>,
    pub offset_hours: i32,
}

/// Builds the report text.
///
/// # Errors
///
/// Returns [`ComposeError::MissingAggregate`] when a dashboard snapshot is
/// present but either aggregate count is unavailable.
pub fn compose_report(input: &ReportInput<'_>) -> Result<String, ComposeError> {
    if let Some(snapshot) = input.snapshot {
        if snapshot.parking_without_code.is_unavailable() {
            return Err(ComposeError::MissingAggregate(PARKING_LABEL));
        }
        if snapshot.toll_without_code.is_unavailable() {
            return Err(ComposeError::MissingAggregate(TOLL_LABEL));
        }
    }

    let any_pending = input
        .results
        .in_display_order(input.venues)
        .any(|(_, outcome)| match outcome {
            VenueOutcome::Collected { pending, .. } => pending.pending_count.unwrap_or(0) > 0,
            VenueOutcome::LoginFailed { .. } => false,
        });

    let mut out = String::new();
    out.push_str(if any_pending {
        "Buen día, se realiza informe de facturación electrónica, al momento contamos con facturación pendiente.\n\n"
    } else {
        "Buen día, se realiza informe de facturación electrónica, al momento no contamos con facturación pendiente.\n\n"
    });
    out.push_str("Se realiza de igual forma revisión de motores FE:\n\n");

    for (venue, outcome) in input.results.in_display_order(input.venues) {
        out.push_str(&venue_line(venue, outcome, input.offset_hours));
        out.push_str("\n\n");
    }

    if let Some(snapshot) = input.snapshot {
        out.push_str(&cufe_section(snapshot));
        if !snapshot.breakdown.is_empty() {
            out.push_str(&breakdown_section(snapshot));
        }
    }

    Ok(out.trim_end().to_string())
}

fn pending_state(pending: &PendingInvoiceRecord) -> String {
    match pending.pending_count {
        Some(0) => "sin facturas pendientes".to_string(),
        Some(count) => format!("con {count} facturas pendientes"),
        None => "sin dato de facturas pendientes".to_string(),
    }
}

fn jobs_timestamp(jobs: &[JobStatusRecord], offset_hours: i32) -> String {
    jobs.first()
        .and_then(|job| job.last_updated.as_deref())
        .map_or_else(|| NO_DATE.to_string(), |raw| job_timestamp(raw, offset_hours))
}

fn venue_line(venue: &VenueConfig, outcome: &VenueOutcome, offset_hours: i32) -> String {
    match outcome {
        VenueOutcome::Collected {
            pending,
            jobs,
            invoices,
        } => format!(
            "* {} {}, con {} facturas del día de hoy, con sus Jobs actualizados ({})",
            venue.display_name,
            pending_state(pending),
            invoices.total_count_for_period,
            jobs_timestamp(jobs, offset_hours),
        ),
        VenueOutcome::LoginFailed { reason } => format!(
            "* {} no pudo ser revisado: {}",
            venue.display_name,
            login_failure(reason)
        ),
    }
}

fn metric_value(reading: MetricReading) -> String {
    match reading {
        MetricReading::Reported { count, .. } => count.to_string(),
        MetricReading::DefaultedZero => "0 (sin registro en el tablero)".to_string(),
        // Composition is blocked before this point.
        MetricReading::Unavailable => "no disponible".to_string(),
    }
}

fn cufe_section(snapshot: &DashboardSnapshot) -> String {
    let heading = match &snapshot.as_of {
        Some(date) => format!("Facturas sin CUFE (corte {}):", date.canonical()),
        None => "Facturas sin CUFE:".to_string(),
    };
    format!(
        "\n{heading}\n\n{PARKING_LABEL}: {}\n{TOLL_LABEL}: {}",
        metric_value(snapshot.parking_without_code),
        metric_value(snapshot.toll_without_code),
    )
}

fn breakdown_section(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::from("\n\nDetalle por asociado:\n");
    for row in &snapshot.breakdown {
        let _ = writeln!(out, "{}: {}", row.entity, row.count);
    }
    let _ = write!(out, "Total: {}", snapshot.breakdown_total());
    out
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
