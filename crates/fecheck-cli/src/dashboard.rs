//! Handler for the `dashboard` command and dashboard capture for `run`.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use fecheck_core::AppConfig;
use fecheck_dashboard::{
    DashboardExtractor, DashboardSnapshot, HtmlFileRenderer, MetricReading, PageRenderer,
    Readiness, RenderServiceClient, PARKING_LABEL, TOLL_LABEL,
};

/// Renders the dashboard (or reads `html_file`) and extracts a snapshot.
///
/// # Errors
///
/// Returns an error when neither a saved file nor both the render service and
/// dashboard URLs are configured, or when rendering fails.
pub(crate) async fn capture_snapshot(
    config: &AppConfig,
    html_file: Option<&Path>,
) -> anyhow::Result<DashboardSnapshot> {
    let extractor = DashboardExtractor::default();

    let page = if let Some(path) = html_file {
        tracing::info!(path = %path.display(), "reading dashboard from file");
        HtmlFileRenderer::new(path).render("").await?
    } else {
        let service_url = config
            .render_service_url
            .as_deref()
            .context("FECHECK_RENDER_SERVICE_URL is not set")?;
        let dashboard_url = config
            .dashboard_url
            .as_deref()
            .context("FECHECK_DASHBOARD_URL is not set")?;
        let settings = extractor.settings();
        let labels = [settings.parking.label.clone(), settings.toll.label.clone()];
        let renderer = RenderServiceClient::new(
            service_url,
            config.render_timeout_secs,
            &config.user_agent,
            Readiness::from_config(config, &labels),
        )?;
        tracing::info!(readiness = %config.render_readiness, "rendering dashboard");
        renderer
            .render(dashboard_url)
            .await
            .context("dashboard render failed")?
    };

    Ok(extractor.extract(&page))
}

fn reading_line(label: &str, reading: MetricReading) -> String {
    match reading {
        MetricReading::Reported { count, strategy } => format!("{label}: {count} ({strategy})"),
        MetricReading::DefaultedZero => format!("{label}: 0 (no encontrado, cero por defecto)"),
        MetricReading::Unavailable => format!("{label}: no disponible"),
    }
}

/// Human-readable snapshot, including which strategy produced each value.
pub(crate) fn describe_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", reading_line(PARKING_LABEL, snapshot.parking_without_code));
    let _ = writeln!(out, "{}", reading_line(TOLL_LABEL, snapshot.toll_without_code));
    match &snapshot.as_of {
        Some(date) => {
            let _ = writeln!(out, "Fecha de corte: {} ({:?})", date.canonical(), date.strategy);
        }
        None => out.push_str("Fecha de corte: no encontrada\n"),
    }
    match snapshot.breakdown_strategy {
        Some(strategy) if !snapshot.breakdown.is_empty() => {
            let _ = writeln!(out, "Detalle por asociado ({strategy:?}):");
            for row in &snapshot.breakdown {
                let _ = writeln!(out, "  {}: {}", row.entity, row.count);
            }
            let _ = write!(out, "  Total: {}", snapshot.breakdown_total());
        }
        _ => out.push_str("Detalle por asociado: no encontrado"),
    }
    out
}

/// Prints the extracted dashboard snapshot.
///
/// # Errors
///
/// Returns an error when the dashboard cannot be obtained.
pub(crate) async fn run_dashboard(config: &AppConfig, html_file: Option<&Path>) -> anyhow::Result<()> {
    let snapshot = capture_snapshot(config, html_file).await?;
    println!("{}", describe_snapshot(&snapshot));
    Ok(())
}
