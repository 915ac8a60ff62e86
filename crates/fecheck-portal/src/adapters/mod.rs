//! Venue data adapters.
//!
//! One [`VenueAdapter`] per venue wraps a [`SessionClient`] and turns the
//! venue's native responses into canonical records. Every fetch is
//! independent: a failure is logged and yields an empty result for that
//! call only.

mod profile;

use fecheck_core::text::visible_lines;
use fecheck_core::{
    Credential, InvoiceSummary, JobStatusRecord, PendingInvoiceRecord, VenueConfig,
};

use crate::aliases::{AliasTable, CanonicalField};
use crate::business_day::BusinessDay;
use crate::error::{AuthFailure, PortalError};
use crate::normalize::{invoice_summary_from_body, normalize_job, pending_from_rows, response_rows};
use crate::page_text::{count_near_marker, MARKER_LOOKAHEAD};
use crate::session::{AuthMethod, SessionClient, SessionSettings};

pub use profile::{FlavorProfile, RANGE_PLACEHOLDER};

pub struct VenueAdapter {
    venue: VenueConfig,
    session: SessionClient,
    profile: FlavorProfile,
    aliases: AliasTable,
    day: BusinessDay,
    other_markers: Vec<String>,
}

impl VenueAdapter {
    /// Builds an unauthenticated adapter for `venue`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError`] if the venue's session cannot be created.
    pub fn for_venue(
        venue: &VenueConfig,
        settings: &SessionSettings,
        day: BusinessDay,
    ) -> Result<Self, PortalError> {
        let session = SessionClient::new(&venue.key, &venue.base_url, settings)?;
        let aliases = AliasTable::for_flavor(venue.flavor)
            .with_override(CanonicalField::PendingCount, &venue.pending_aliases);
        Ok(Self {
            venue: venue.clone(),
            session,
            profile: FlavorProfile::for_venue(venue),
            aliases,
            day,
            other_markers: Vec::new(),
        })
    }

    /// Markers of the other venues in the run; the page-text scan for this
    /// venue stops where one of them appears. This venue's own marker is
    /// ignored.
    #[must_use]
    pub fn with_other_markers(mut self, markers: &[String]) -> Self {
        let own = self.venue.marker();
        self.other_markers = markers
            .iter()
            .filter(|m| !m.trim().is_empty() && !m.trim().eq_ignore_ascii_case(own.trim()))
            .cloned()
            .collect();
        self
    }

    #[must_use]
    pub fn venue(&self) -> &VenueConfig {
        &self.venue
    }

    /// Logs in with the first of the flavour's contracts that succeeds.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthFailure`] of the last contract tried.
    pub async fn login(&mut self, credential: &Credential) -> Result<AuthMethod, AuthFailure> {
        self.session
            .authenticate_any(&self.profile.login, credential)
            .await
    }

    /// Pending invoices: structured rows first, then a text scan for the
    /// venue's marker. Never reports zero for a count it could not read.
    pub async fn fetch_pending(&self) -> PendingInvoiceRecord {
        let name = self.venue.display_name.as_str();
        let response = match self
            .session
            .get_first_success("pending", &self.profile.pending)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(venue = %self.venue.key, error = %e, "pending fetch failed");
                return PendingInvoiceRecord::unavailable(name);
            }
        };

        if let Ok(body) = response.json() {
            let rows = response_rows(&body);
            if let Some(record) = pending_from_rows(&rows, &self.aliases, name) {
                tracing::debug!(venue = %self.venue.key, "pending count from structured rows");
                return record;
            }
        }

        let marker = self.venue.marker();
        let lines = visible_lines(&response.body);
        match count_near_marker(&lines, &marker, &self.other_markers, MARKER_LOOKAHEAD) {
            Some(count) => {
                tracing::debug!(venue = %self.venue.key, %marker, count, "pending count from page text");
                PendingInvoiceRecord {
                    venue_name: name.to_string(),
                    pending_count: Some(count),
                    venue_identifier: None,
                }
            }
            None => {
                tracing::warn!(venue = %self.venue.key, %marker, "no pending count found");
                PendingInvoiceRecord::unavailable(name)
            }
        }
    }

    /// Job configuration rows. Venues without a jobs endpoint return none.
    pub async fn fetch_jobs(&self) -> Vec<JobStatusRecord> {
        if self.profile.jobs.is_empty() {
            return Vec::new();
        }
        let body = match self.fetch_json("jobs", &self.profile.jobs).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(venue = %self.venue.key, error = %e, "jobs fetch failed");
                return Vec::new();
            }
        };
        response_rows(&body)
            .into_iter()
            .filter_map(|row| normalize_job(row, &self.aliases))
            .collect()
    }

    /// Invoices for the adapter's business day.
    pub async fn fetch_invoice_summary(&self) -> InvoiceSummary {
        if self.profile.invoices.is_empty() {
            return InvoiceSummary::default();
        }
        let candidates = self
            .profile
            .invoice_paths(&self.day.encoded_transdate_filter());
        match self.fetch_json("invoices", &candidates).await {
            Ok(body) => invoice_summary_from_body(&body, &self.aliases),
            Err(e) => {
                tracing::warn!(
                    venue = %self.venue.key,
                    day = %self.day.date(),
                    error = %e,
                    "invoice summary fetch failed"
                );
                InvoiceSummary::default()
            }
        }
    }

    async fn fetch_json(
        &self,
        resource: &str,
        candidates: &[String],
    ) -> Result<serde_json::Value, PortalError> {
        self.session
            .get_first_success(resource, candidates)
            .await?
            .json()
    }
}
