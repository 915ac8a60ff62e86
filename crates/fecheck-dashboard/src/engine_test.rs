use super::*;
use crate::types::{BreakdownRow, BreakdownStrategy, DateStrategy, MissingPolicy};

fn extract(page: &RenderedPage) -> DashboardSnapshot {
    DashboardExtractor::default().extract(page)
}

// -----------------------------------------------------------------------
// aggregate cascade
// -----------------------------------------------------------------------

#[test]
fn plain_text_dashboard_resolves_counts_and_date() {
    let page = RenderedPage::new("Parqueaderos\n1,234\nPeajes\n0\n03/10/2025", "");
    let snapshot = extract(&page);

    assert_eq!(
        snapshot.parking_without_code,
        MetricReading::Reported {
            count: 1234,
            strategy: Strategy::LineProximity
        }
    );
    assert_eq!(
        snapshot.toll_without_code,
        MetricReading::Reported {
            count: 0,
            strategy: Strategy::LineProximity
        }
    );
    let as_of = snapshot.as_of.expect("date should resolve");
    assert_eq!(as_of.canonical(), "10/03/2025");
    assert_eq!(as_of.strategy, DateStrategy::AggregateWindow);
}

#[test]
fn line_proximity_outranks_table_scan() {
    let html = "<table><tr><td>Parqueaderos</td><td>99</td></tr></table>";
    let page = RenderedPage::new("Parqueaderos\n15", html);
    assert_eq!(
        extract(&page).parking_without_code,
        MetricReading::Reported {
            count: 15,
            strategy: Strategy::LineProximity
        }
    );
}

#[test]
fn dom_neighbor_used_when_text_has_no_nearby_number() {
    let html = r#"<div class="kpi"><div>Peajes</div><div>7</div></div>"#;
    let page = RenderedPage::new("Peajes\ncargando", html);
    assert_eq!(
        extract(&page).toll_without_code,
        MetricReading::Reported {
            count: 7,
            strategy: Strategy::DomNeighbor
        }
    );
}

#[test]
fn table_scan_used_after_dom_neighbor() {
    // The label's only sibling is non-numeric text, so the neighbor scan misses.
    let html = r#"<div role="row"><span role="cell"><b>Parqueaderos</b> (sin CUFE)</span>
                  <span role="cell">42</span></div>"#;
    let page = RenderedPage::new("Parqueaderos (sin CUFE)", html);
    assert_eq!(
        extract(&page).parking_without_code,
        MetricReading::Reported {
            count: 42,
            strategy: Strategy::TableScan
        }
    );
}

#[test]
fn document_regex_reaches_past_lookahead() {
    let page = RenderedPage::new("Parqueaderos sin registro\na\nb\nc\nd 12", "");
    assert_eq!(
        extract(&page).parking_without_code,
        MetricReading::Reported {
            count: 12,
            strategy: Strategy::DocumentRegex
        }
    );
}

#[test]
fn missing_metrics_follow_their_policies() {
    let snapshot = extract(&RenderedPage::new("Informe de facturación", ""));
    assert_eq!(snapshot.parking_without_code, MetricReading::Unavailable);
    assert_eq!(snapshot.toll_without_code, MetricReading::DefaultedZero);
    assert!(snapshot.as_of.is_none());
    assert!(snapshot.breakdown.is_empty());
    assert!(snapshot.breakdown_strategy.is_none());
}

#[test]
fn policies_are_configurable() {
    let settings = ExtractionSettings {
        toll: MetricSpec::new("Peajes", MissingPolicy::Unavailable),
        ..ExtractionSettings::default()
    };
    let snapshot = DashboardExtractor::new(settings).extract(&RenderedPage::default());
    assert_eq!(snapshot.toll_without_code, MetricReading::Unavailable);
}

// -----------------------------------------------------------------------
// breakdown and whole-page behaviour
// -----------------------------------------------------------------------

#[test]
fn full_dashboard_from_html() {
    let html = r#"<html><body>
        <div class="card"><h3>Parqueaderos</h3><p>430</p></div>
        <div class="card"><h3>Peajes</h3><p>2</p></div>
        <span>Fecha de corte: 09/25/2025</span>
        <table>
          <tr><th>ASOCIADO</th><th>CANTIDAD</th><th>PORCENTAJE</th></tr>
          <tr><td>ANDINO</td><td>300</td><td>69%</td></tr>
          <tr><td>BULEVAR</td><td>130</td><td>30%</td></tr>
          <tr><td>ANDINO</td><td>300</td><td>69%</td></tr>
          <tr><td>TOTAL</td><td>430</td><td>100%</td></tr>
        </table>
        <script>var cards = 12;</script>
    </body></html>"#;
    let snapshot = extract(&RenderedPage::from_html(html));

    assert_eq!(snapshot.parking_without_code.count(), Some(430));
    assert_eq!(snapshot.toll_without_code.count(), Some(2));
    assert_eq!(
        snapshot.as_of.map(|d| (d.canonical(), d.strategy)),
        Some(("25/09/2025".to_string(), DateStrategy::LabelProximity))
    );
    assert_eq!(snapshot.breakdown_strategy, Some(BreakdownStrategy::TableScan));
    assert_eq!(
        snapshot.breakdown,
        vec![
            BreakdownRow {
                entity: "ANDINO".to_string(),
                count: 300
            },
            BreakdownRow {
                entity: "BULEVAR".to_string(),
                count: 130
            },
        ]
    );
    assert_eq!(snapshot.breakdown_total(), 430);
}

#[test]
fn extraction_is_idempotent() {
    let page = RenderedPage::from_html(
        "<div>Parqueaderos</div><div>5</div><div>Peajes</div><div>1</div>\
         <div>ASOCIADO</div><div>ARKADIA</div><div>5</div>",
    );
    let extractor = DashboardExtractor::default();
    assert_eq!(extractor.extract(&page), extractor.extract(&page));
}

#[test]
fn text_breakdown_starts_at_the_table_not_the_cards() {
    let page = RenderedPage::new(
        "Parqueaderos\n430\nPeajes\n2\nSin CUFE ayer\n12\nASOCIADO\nCANTIDAD\nANDINO\n300\nBULEVAR\n130",
        "",
    );
    let snapshot = extract(&page);
    assert_eq!(snapshot.breakdown_strategy, Some(BreakdownStrategy::WindowedText));
    assert_eq!(
        snapshot.breakdown,
        vec![
            BreakdownRow {
                entity: "ANDINO".to_string(),
                count: 300
            },
            BreakdownRow {
                entity: "BULEVAR".to_string(),
                count: 130
            },
        ]
    );
    assert_eq!(snapshot.breakdown_total(), 430);
}

#[test]
fn metric_without_number_does_not_take_the_next_metric_value() {
    let snapshot = extract(&RenderedPage::new("Parqueaderos\nPeajes\n0", ""));
    assert_eq!(snapshot.parking_without_code, MetricReading::Unavailable);
    assert_eq!(
        snapshot.toll_without_code,
        MetricReading::Reported {
            count: 0,
            strategy: Strategy::LineProximity
        }
    );
}
