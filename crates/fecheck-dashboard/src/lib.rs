//! Heuristic extraction of the CUFE dashboard.
//!
//! The dashboard is an externally hosted, script-rendered report with no
//! stable API. A [`PageRenderer`] obtains its content and
//! [`DashboardExtractor`] recovers the aggregate counts, the as-of date and
//! the per-entity breakdown through ordered fallback strategies.

pub mod breakdown;
pub mod dates;
pub mod engine;
pub mod error;
pub mod page;
pub mod render;
pub mod strategies;
pub mod types;

pub use engine::{DashboardExtractor, ExtractionSettings};
pub use error::RenderError;
pub use page::RenderedPage;
pub use render::{HtmlFileRenderer, PageRenderer, Readiness, RenderServiceClient};
pub use types::{
    BreakdownRow, BreakdownStrategy, DashboardSnapshot, DateStrategy, MetricReading, MetricSpec,
    MissingPolicy, ResolvedDate, Strategy, PARKING_LABEL, TOLL_LABEL,
};
