use std::path::PathBuf;

/// How the dashboard renderer decides the report has finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderReadiness {
    /// Blind wait of `render_wait_secs` before reading the page.
    FixedDelay,
    /// Re-render until the expected labels appear, bounded by
    /// `render_timeout_secs`.
    PollUntilText,
}

impl std::fmt::Display for RenderReadiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderReadiness::FixedDelay => write!(f, "fixed"),
            RenderReadiness::PollUntilText => write!(f, "poll"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub venues_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_venues: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Upper bound on any single back-off sleep.
    pub retry_max_delay_ms: u64,
    /// Whole-hour UTC offset of the business day (Bogotá is `-5`).
    pub business_utc_offset_hours: i32,
    pub dashboard_url: Option<String>,
    pub render_service_url: Option<String>,
    pub render_wait_secs: u64,
    pub render_readiness: RenderReadiness,
    pub render_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The dashboard link embeds an access key in its query string.
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("venues_path", &self.venues_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_venues", &self.max_concurrent_venues)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("retry_max_delay_ms", &self.retry_max_delay_ms)
            .field("business_utc_offset_hours", &self.business_utc_offset_hours)
            .field(
                "dashboard_url",
                &self.dashboard_url.as_ref().map(|_| "[redacted]"),
            )
            .field("render_service_url", &self.render_service_url)
            .field("render_wait_secs", &self.render_wait_secs)
            .field("render_readiness", &self.render_readiness)
            .field("render_timeout_secs", &self.render_timeout_secs)
            .finish()
    }
}
