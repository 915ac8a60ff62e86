//! Default endpoints and login contracts per backend flavour.

use fecheck_core::{PortalFlavor, VenueConfig};

use crate::session::LoginContract;

/// Placeholder in invoice paths replaced by the encoded business-day filter.
pub const RANGE_PLACEHOLDER: &str = "{range}";

const GOPASS_LOGIN: &str = "/api/accc_auth/login";
const GOPASS_PENDING: &str = "/api/trns_invoices/pendingEmit?$top=10&$skip=0\
&$select=pending,idcommerce,name&$orderby=idserietype%20asc&additionalQuery=";
const GOPASS_JOBS: &str = "/api/genc_jobsconfig?$top=10&$skip=0\
&$select=idjob,jobname,raiseevents,enabled,updatedat&$orderby=idjob%20asc";
const GOPASS_INVOICES: &str =
    "/api/trns_transparking/getcustom?$top=10&$skip=0&additionalQuery={range}&headers=false";

const FACTURAPARK_LOGIN: &str = "/auth/login";
const FACTURAPARK_LANDING: &str = "console/home";
const FACTURAPARK_PENDING: &str = "/console/associatesManagement/invoicing/pendingEmit";

/// Login contracts and candidate paths an adapter works with.
#[derive(Debug, Clone)]
pub struct FlavorProfile {
    pub login: Vec<LoginContract>,
    pub pending: Vec<String>,
    pub jobs: Vec<String>,
    pub invoices: Vec<String>,
}

impl FlavorProfile {
    #[must_use]
    pub fn defaults(flavor: PortalFlavor) -> Self {
        match flavor {
            PortalFlavor::Gopass => Self {
                login: vec![LoginContract::json(GOPASS_LOGIN)],
                pending: vec![GOPASS_PENDING.to_string()],
                jobs: vec![GOPASS_JOBS.to_string()],
                invoices: vec![GOPASS_INVOICES.to_string()],
            },
            // The console exposes neither a jobs table nor an invoice API.
            PortalFlavor::Facturapark => Self {
                login: vec![LoginContract::form(FACTURAPARK_LOGIN, FACTURAPARK_LANDING)],
                pending: vec![FACTURAPARK_PENDING.to_string()],
                jobs: Vec::new(),
                invoices: Vec::new(),
            },
        }
    }

    /// Flavour defaults with the venue's non-empty path lists swapped in.
    ///
    /// Overridden login paths keep the flavour's contract shape.
    #[must_use]
    pub fn for_venue(venue: &VenueConfig) -> Self {
        let mut profile = Self::defaults(venue.flavor);
        let paths = &venue.paths;

        if !paths.login.is_empty() {
            profile.login = paths
                .login
                .iter()
                .map(|path| match venue.flavor {
                    PortalFlavor::Gopass => LoginContract::json(path),
                    PortalFlavor::Facturapark => LoginContract::form(path, FACTURAPARK_LANDING),
                })
                .collect();
        }
        if !paths.pending.is_empty() {
            profile.pending.clone_from(&paths.pending);
        }
        if !paths.jobs.is_empty() {
            profile.jobs.clone_from(&paths.jobs);
        }
        if !paths.invoices.is_empty() {
            profile.invoices.clone_from(&paths.invoices);
        }
        profile
    }

    /// Invoice candidates with [`RANGE_PLACEHOLDER`] filled in.
    #[must_use]
    pub fn invoice_paths(&self, encoded_range: &str) -> Vec<String> {
        self.invoices
            .iter()
            .map(|path| path.replace(RANGE_PLACEHOLDER, encoded_range))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use fecheck_core::{JobColumns, VenuePaths};

    use super::*;
    use crate::session::LoginEncoding;

    fn venue(flavor: PortalFlavor, paths: VenuePaths) -> VenueConfig {
        VenueConfig {
            key: "bulevar".to_string(),
            display_name: "Motor Bulevar".to_string(),
            flavor,
            base_url: "https://facturabulevar.gopass.com.co".to_string(),
            credentials_env: "BULEVAR".to_string(),
            entity_marker: None,
            paths,
            pending_aliases: Vec::new(),
            job_columns: JobColumns::Basic,
        }
    }

    #[test]
    fn gopass_defaults_use_json_login_and_odata_paths() {
        let profile = FlavorProfile::defaults(PortalFlavor::Gopass);
        assert_eq!(profile.login.len(), 1);
        assert_eq!(profile.login[0].encoding, LoginEncoding::Json);
        assert!(profile.pending[0].starts_with("/api/trns_invoices/pendingEmit?"));
        assert!(profile.jobs[0].contains("$orderby=idjob%20asc"));
        assert!(profile.invoices[0].contains(RANGE_PLACEHOLDER));
    }

    #[test]
    fn facturapark_defaults_have_no_jobs_or_invoices() {
        let profile = FlavorProfile::defaults(PortalFlavor::Facturapark);
        assert_eq!(profile.login[0].encoding, LoginEncoding::Form);
        assert!(profile.login[0].warm_up);
        assert!(profile.jobs.is_empty());
        assert!(profile.invoices.is_empty());
    }

    #[test]
    fn venue_paths_override_only_listed_resources() {
        let paths = VenuePaths {
            login: vec!["/api/v2/login".to_string(), "/api/accc_auth/login".to_string()],
            pending: Vec::new(),
            jobs: vec!["/api/jobs".to_string()],
            invoices: Vec::new(),
        };
        let profile = FlavorProfile::for_venue(&venue(PortalFlavor::Gopass, paths));
        assert_eq!(profile.login.len(), 2);
        assert_eq!(profile.login[0].path, "/api/v2/login");
        assert_eq!(profile.login[0].encoding, LoginEncoding::Json);
        assert_eq!(profile.jobs, vec!["/api/jobs".to_string()]);
        assert_eq!(
            profile.pending,
            FlavorProfile::defaults(PortalFlavor::Gopass).pending
        );
    }

    #[test]
    fn invoice_paths_fill_range() {
        let profile = FlavorProfile::defaults(PortalFlavor::Gopass);
        let paths = profile.invoice_paths("X%20Y");
        assert_eq!(
            paths[0],
            "/api/trns_transparking/getcustom?$top=10&$skip=0&additionalQuery=X%20Y&headers=false"
        );
    }
}
