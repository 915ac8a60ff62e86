//! Handlers for the `run` and `venues` commands.
//!
//! Venue failures never abort a run; they surface as failure lines in the
//! report. Configuration problems and a broken dashboard do.

use std::path::Path;

use anyhow::bail;
use fecheck_core::{load_venues, resolve_credential, AppConfig, VenueConfig};
use fecheck_portal::{prepare_jobs, run_venues, RunResults, RunSettings};

use crate::dashboard::capture_snapshot;
use crate::display::{catalogue_line, venue_detail};
use crate::report::{compose_report, ReportInput};

/// Keeps the venues named in `filter` (case-insensitive), in catalogue order.
///
/// An empty filter keeps the whole catalogue.
///
/// # Errors
///
/// Returns an error naming the first key that is not in the catalogue.
pub(crate) fn select_venues(
    catalogue: Vec<VenueConfig>,
    filter: &[String],
) -> anyhow::Result<Vec<VenueConfig>> {
    if filter.is_empty() {
        return Ok(catalogue);
    }
    if let Some(unknown) = filter
        .iter()
        .find(|key| !catalogue.iter().any(|v| v.key.eq_ignore_ascii_case(key)))
    {
        let known: Vec<&str> = catalogue.iter().map(|v| v.key.as_str()).collect();
        bail!("venue '{unknown}' not found; known venues: {}", known.join(", "));
    }
    Ok(catalogue
        .into_iter()
        .filter(|v| filter.iter().any(|key| v.key.eq_ignore_ascii_case(key)))
        .collect())
}

fn load_selected(config: &AppConfig, filter: &[String]) -> anyhow::Result<Vec<VenueConfig>> {
    let catalogue = load_venues(&config.venues_path)?.venues;
    select_venues(catalogue, filter)
}

async fn collect(config: &AppConfig, venues: &[VenueConfig]) -> RunResults {
    let settings = RunSettings::from_config(config);
    tracing::info!(
        venues = venues.len(),
        day = %settings.business_day.date(),
        "collecting venue status"
    );
    let jobs = prepare_jobs(venues, |key| std::env::var(key));
    run_venues(jobs, &settings).await
}

/// Collects venues and the dashboard concurrently and prints the report.
///
/// # Errors
///
/// Returns an error if the catalogue cannot be loaded, the dashboard cannot
/// be rendered, or an aggregate dashboard count is unavailable.
pub(crate) async fn run_report(
    config: &AppConfig,
    filter: &[String],
    skip_dashboard: bool,
    html_file: Option<&Path>,
) -> anyhow::Result<()> {
    let venues = load_selected(config, filter)?;

    let dashboard = async {
        if skip_dashboard {
            tracing::info!("dashboard skipped");
            Ok(None)
        } else {
            capture_snapshot(config, html_file).await.map(Some)
        }
    };
    let (results, snapshot) = tokio::join!(collect(config, &venues), dashboard);
    let snapshot = snapshot?;

    let report = compose_report(&ReportInput {
        venues: &venues,
        results: &results,
        snapshot: snapshot.as_ref(),
        offset_hours: config.business_utc_offset_hours,
    })?;
    println!("{report}");
    Ok(())
}

/// Collects the selected venues and prints their detail blocks.
///
/// # Errors
///
/// Returns an error if the catalogue cannot be loaded or the filter names an
/// unknown venue.
pub(crate) async fn show_venues(config: &AppConfig, filter: &[String]) -> anyhow::Result<()> {
    let venues = load_selected(config, filter)?;
    let results = collect(config, &venues).await;
    for (venue, outcome) in results.in_display_order(&venues) {
        println!(
            "{}",
            venue_detail(venue, outcome, config.business_utc_offset_hours)
        );
    }
    Ok(())
}

/// Prints the catalogue and whether each venue has credentials configured.
///
/// # Errors
///
/// Returns an error if the catalogue cannot be loaded.
pub(crate) fn list_venues(config: &AppConfig) -> anyhow::Result<()> {
    let catalogue = load_venues(&config.venues_path)?.venues;
    for venue in &catalogue {
        let configured = resolve_credential(venue, |key| std::env::var(key)).is_some();
        println!("{}", catalogue_line(venue, configured));
    }
    Ok(())
}
