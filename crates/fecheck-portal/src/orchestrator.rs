//! Concurrent per-venue collection.
//!
//! Each venue runs in its own task with its own session; one venue's failure
//! never affects another's outcome. Results come back as an explicit
//! [`RunResults`] map instead of shared state.

use std::collections::HashMap;

use fecheck_core::{
    resolve_credential, AppConfig, Credential, InvoiceSummary, JobStatusRecord,
    PendingInvoiceRecord, VenueConfig,
};
use futures::stream::{self, StreamExt};

use crate::adapters::VenueAdapter;
use crate::business_day::BusinessDay;
use crate::error::AuthFailure;
use crate::session::SessionSettings;

/// What one venue produced during a run.
#[derive(Debug, Clone)]
pub enum VenueOutcome {
    LoginFailed {
        reason: AuthFailure,
    },
    Collected {
        pending: PendingInvoiceRecord,
        jobs: Vec<JobStatusRecord>,
        invoices: InvoiceSummary,
    },
}

impl VenueOutcome {
    #[must_use]
    pub fn is_collected(&self) -> bool {
        matches!(self, VenueOutcome::Collected { .. })
    }
}

/// Per-run outcomes keyed by venue key.
#[derive(Debug, Default)]
pub struct RunResults {
    outcomes: HashMap<String, VenueOutcome>,
}

impl RunResults {
    pub fn insert(&mut self, venue_key: &str, outcome: VenueOutcome) {
        self.outcomes.insert(venue_key.to_string(), outcome);
    }

    #[must_use]
    pub fn get(&self, venue_key: &str) -> Option<&VenueOutcome> {
        self.outcomes.get(venue_key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outcomes in catalogue order; venues without an outcome are skipped.
    pub fn in_display_order<'a>(
        &'a self,
        venues: &'a [VenueConfig],
    ) -> impl Iterator<Item = (&'a VenueConfig, &'a VenueOutcome)> + 'a {
        venues
            .iter()
            .filter_map(move |venue| self.get(&venue.key).map(|outcome| (venue, outcome)))
    }
}

/// A venue scheduled for collection with its resolved credential.
#[derive(Debug, Clone)]
pub struct VenueJob {
    pub venue: VenueConfig,
    pub credential: Option<Credential>,
}

/// Resolves each venue's credential through `lookup` (normally `std::env::var`).
pub fn prepare_jobs<F>(venues: &[VenueConfig], lookup: F) -> Vec<VenueJob>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    venues
        .iter()
        .map(|venue| VenueJob {
            credential: resolve_credential(venue, &lookup),
            venue: venue.clone(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RunSettings {
    pub session: SessionSettings,
    pub max_concurrent_venues: usize,
    pub business_day: BusinessDay,
}

impl RunSettings {
    /// Settings for a run starting now.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            session: SessionSettings {
                timeout_secs: config.request_timeout_secs,
                user_agent: config.user_agent.clone(),
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
                max_backoff_ms: config.retry_max_delay_ms,
            },
            max_concurrent_venues: config.max_concurrent_venues,
            business_day: BusinessDay::today(config.business_utc_offset_hours),
        }
    }
}

/// Collects every venue concurrently, at most `max_concurrent_venues` at a time.
pub async fn run_venues(jobs: Vec<VenueJob>, settings: &RunSettings) -> RunResults {
    let max_concurrent = settings.max_concurrent_venues.max(1);
    let venue_count = jobs.len();
    let markers: Vec<String> = jobs.iter().map(|job| job.venue.marker()).collect();
    let markers = markers.as_slice();

    let outcomes: Vec<(String, VenueOutcome)> = stream::iter(jobs)
        .map(|job| async move {
            let outcome = collect_venue(&job, settings, markers).await;
            (job.venue.key, outcome)
        })
        .buffer_unordered(max_concurrent)
        .collect()
        .await;

    let mut results = RunResults::default();
    let mut failed = 0usize;
    for (key, outcome) in outcomes {
        if !outcome.is_collected() {
            failed += 1;
        }
        results.insert(&key, outcome);
    }
    tracing::info!(venues = venue_count, failed, "venue collection finished");
    results
}

async fn collect_venue(job: &VenueJob, settings: &RunSettings, markers: &[String]) -> VenueOutcome {
    let key = job.venue.key.as_str();

    let Some(credential) = &job.credential else {
        tracing::warn!(venue = %key, prefix = %job.venue.credentials_env, "credentials not configured");
        return VenueOutcome::LoginFailed {
            reason: AuthFailure::MissingCredential,
        };
    };

    let mut adapter =
        match VenueAdapter::for_venue(&job.venue, &settings.session, settings.business_day) {
            Ok(adapter) => adapter.with_other_markers(markers),
            Err(e) => {
                tracing::warn!(venue = %key, error = %e, "venue adapter could not be built");
                return VenueOutcome::LoginFailed {
                    reason: AuthFailure::InvalidEndpoint(e.to_string()),
                };
            }
        };

    if let Err(reason) = adapter.login(credential).await {
        tracing::warn!(venue = %key, %reason, "venue login failed");
        return VenueOutcome::LoginFailed { reason };
    }

    let (pending, jobs, invoices) = tokio::join!(
        adapter.fetch_pending(),
        adapter.fetch_jobs(),
        adapter.fetch_invoice_summary(),
    );
    tracing::info!(
        venue = %key,
        pending = ?pending.pending_count,
        jobs = jobs.len(),
        invoices_today = invoices.total_count_for_period,
        "venue collected"
    );
    VenueOutcome::Collected {
        pending,
        jobs,
        invoices,
    }
}

#[cfg(test)]
mod tests {
    use fecheck_core::{JobColumns, PortalFlavor, VenuePaths};

    use super::*;

    fn venue(key: &str) -> VenueConfig {
        VenueConfig {
            key: key.to_string(),
            display_name: key.to_uppercase(),
            flavor: PortalFlavor::Gopass,
            base_url: "https://portal.example".to_string(),
            credentials_env: key.to_uppercase(),
            entity_marker: None,
            paths: VenuePaths::default(),
            pending_aliases: Vec::new(),
            job_columns: JobColumns::Basic,
        }
    }

    #[test]
    fn display_order_follows_catalogue_not_insertion() {
        let venues = vec![venue("andino"), venue("bulevar"), venue("arkadia")];
        let mut results = RunResults::default();
        results.insert(
            "arkadia",
            VenueOutcome::LoginFailed {
                reason: AuthFailure::NoSuccessSignal,
            },
        );
        results.insert(
            "andino",
            VenueOutcome::LoginFailed {
                reason: AuthFailure::MissingCredential,
            },
        );
        let keys: Vec<&str> = results
            .in_display_order(&venues)
            .map(|(v, _)| v.key.as_str())
            .collect();
        assert_eq!(keys, vec!["andino", "arkadia"]);
    }

    #[test]
    fn prepare_jobs_resolves_credentials_per_venue() {
        let venues = vec![venue("andino"), venue("bulevar")];
        let jobs = prepare_jobs(&venues, |key| match key {
            "ANDINO_USERNAME" => Ok("ops@andino.example".to_string()),
            "ANDINO_PASSWORD" => Ok("s3cret".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        });
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0].credential.as_ref().map(|c| c.identifier.as_str()),
            Some("ops@andino.example")
        );
        assert!(jobs[1].credential.is_none());
    }

    #[tokio::test]
    async fn missing_credential_is_login_failure_without_network() {
        let settings = RunSettings {
            session: SessionSettings::default(),
            max_concurrent_venues: 2,
            business_day: BusinessDay::today(-5),
        };
        let results = run_venues(
            vec![VenueJob {
                venue: venue("fontanar"),
                credential: None,
            }],
            &settings,
        )
        .await;
        assert!(matches!(
            results.get("fontanar"),
            Some(VenueOutcome::LoginFailed {
                reason: AuthFailure::MissingCredential
            })
        ));
    }
}
