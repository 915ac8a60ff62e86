//! Extraction results for the external CUFE dashboard.

use chrono::NaiveDate;
use serde::Serialize;

/// Label of the parking aggregate on the dashboard.
pub const PARKING_LABEL: &str = "Parqueaderos";
/// Label of the toll aggregate on the dashboard.
pub const TOLL_LABEL: &str = "Peajes";

/// Aggregate-count strategies, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LineProximity,
    DomNeighbor,
    TableScan,
    DocumentRegex,
    /// Lower confidence: values assigned by position inside a line window.
    WindowedCooccurrence,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::LineProximity => "line_proximity",
            Strategy::DomNeighbor => "dom_neighbor",
            Strategy::TableScan => "table_scan",
            Strategy::DocumentRegex => "document_regex",
            Strategy::WindowedCooccurrence => "windowed_cooccurrence",
        };
        f.write_str(name)
    }
}

/// What to report when no strategy finds a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    Unavailable,
    DefaultZero,
}

/// A named aggregate and its missing policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub label: String,
    pub policy: MissingPolicy,
}

impl MetricSpec {
    #[must_use]
    pub fn new(label: &str, policy: MissingPolicy) -> Self {
        Self {
            label: label.to_string(),
            policy,
        }
    }

    #[must_use]
    pub fn parking() -> Self {
        Self::new(PARKING_LABEL, MissingPolicy::Unavailable)
    }

    /// Tolls default to zero when absent: "not found" means nothing to report.
    #[must_use]
    pub fn toll() -> Self {
        Self::new(TOLL_LABEL, MissingPolicy::DefaultZero)
    }
}

/// Outcome for one aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MetricReading {
    Reported { count: u64, strategy: Strategy },
    /// Not found; zero substituted by policy. Distinct from a reported zero.
    DefaultedZero,
    Unavailable,
}

impl MetricReading {
    /// The value to print, if any. Defaulted readings count as zero.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        match self {
            MetricReading::Reported { count, .. } => Some(*count),
            MetricReading::DefaultedZero => Some(0),
            MetricReading::Unavailable => None,
        }
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetricReading::Unavailable)
    }

    /// Applies `policy` to an unresolved metric.
    #[must_use]
    pub fn missing(policy: MissingPolicy) -> Self {
        match policy {
            MissingPolicy::Unavailable => MetricReading::Unavailable,
            MissingPolicy::DefaultZero => MetricReading::DefaultedZero,
        }
    }
}

/// As-of date strategies, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateStrategy {
    LabelProximity,
    AggregateWindow,
    FirstInDocument,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub strategy: DateStrategy,
}

impl ResolvedDate {
    /// `dd/mm/yyyy`.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStrategy {
    TableScan,
    WindowedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub entity: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub parking_without_code: MetricReading,
    pub toll_without_code: MetricReading,
    pub as_of: Option<ResolvedDate>,
    /// Empty when no breakdown could be recovered.
    pub breakdown: Vec<BreakdownRow>,
    pub breakdown_strategy: Option<BreakdownStrategy>,
}

impl DashboardSnapshot {
    /// Sum of the breakdown counts.
    #[must_use]
    pub fn breakdown_total(&self) -> u64 {
        self.breakdown.iter().map(|row| row.count).sum()
    }
}
