//! The extraction cascade over a rendered dashboard.

use scraper::Html;

use crate::breakdown::resolve_breakdown;
use crate::dates::resolve_as_of;
use crate::page::RenderedPage;
use crate::strategies::{
    document_regex, dom_neighbor, line_proximity, table_rows, table_scan, windowed_cooccurrence,
};
use crate::types::{DashboardSnapshot, MetricReading, MetricSpec, Strategy};

/// Tunables for the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSettings {
    /// Lines after a label searched by the line-proximity strategies.
    pub lookahead: usize,
    /// Lines in a co-occurrence window.
    pub window: usize,
    /// Lines after a breakdown header searched for entity/count pairs.
    pub breakdown_window: usize,
    pub parking: MetricSpec,
    pub toll: MetricSpec,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            lookahead: 3,
            window: 8,
            breakdown_window: 40,
            parking: MetricSpec::parking(),
            toll: MetricSpec::toll(),
        }
    }
}

/// Stateless extractor; the same page always yields the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct DashboardExtractor {
    settings: ExtractionSettings,
}

struct PageView<'a> {
    page: &'a RenderedPage,
    lines: Vec<&'a str>,
    document: Html,
    rows: Vec<Vec<String>>,
}

impl DashboardExtractor {
    #[must_use]
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    #[must_use]
    pub fn extract(&self, page: &RenderedPage) -> DashboardSnapshot {
        let document = page.document();
        let rows = table_rows(&document);
        let view = PageView {
            page,
            lines: page.lines(),
            document,
            rows,
        };

        let (window_parking, window_toll) = windowed_cooccurrence(
            &view.lines,
            &self.settings.parking.label,
            &self.settings.toll.label,
            self.settings.window,
        );
        let parking_label = self.settings.parking.label.as_str();
        let toll_label = self.settings.toll.label.as_str();
        let parking =
            self.resolve_metric(&view, &self.settings.parking, &[toll_label], window_parking);
        let toll = self.resolve_metric(&view, &self.settings.toll, &[parking_label], window_toll);

        let labels = [
            self.settings.parking.label.clone(),
            self.settings.toll.label.clone(),
        ];
        let as_of = resolve_as_of(
            &view.lines,
            &labels,
            self.settings.lookahead,
            self.settings.window,
        );
        let (breakdown, breakdown_strategy) =
            match resolve_breakdown(&view.document, &view.lines, self.settings.breakdown_window) {
                Some((rows, strategy)) => (rows, Some(strategy)),
                None => (Vec::new(), None),
            };

        DashboardSnapshot {
            parking_without_code: parking,
            toll_without_code: toll,
            as_of,
            breakdown,
            breakdown_strategy,
        }
    }

    fn resolve_metric(
        &self,
        view: &PageView<'_>,
        metric: &MetricSpec,
        siblings: &[&str],
        windowed: Option<u64>,
    ) -> MetricReading {
        let label = metric.label.as_str();
        let lookahead = self.settings.lookahead;
        let attempts: [(Strategy, &dyn Fn() -> Option<u64>); 5] = [
            (Strategy::LineProximity, &|| {
                line_proximity(&view.lines, label, siblings, lookahead)
            }),
            (Strategy::DomNeighbor, &|| dom_neighbor(&view.document, label)),
            (Strategy::TableScan, &|| table_scan(&view.rows, label)),
            (Strategy::DocumentRegex, &|| {
                document_regex(&view.page.text, label, siblings)
            }),
            (Strategy::WindowedCooccurrence, &|| windowed),
        ];

        for (strategy, attempt) in attempts {
            match attempt() {
                Some(count) => {
                    tracing::debug!(metric = label, %strategy, count, "metric resolved");
                    return MetricReading::Reported { count, strategy };
                }
                None => tracing::debug!(metric = label, %strategy, "strategy found nothing"),
            }
        }

        tracing::warn!(metric = label, policy = ?metric.policy, "metric not found by any strategy");
        MetricReading::missing(metric.policy)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
