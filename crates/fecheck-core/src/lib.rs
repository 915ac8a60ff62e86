//! Shared domain records and configuration for fecheck.
//!
//! Every venue adapter normalises into the records defined in [`types`];
//! runtime settings come from environment variables ([`config`]) and the
//! venue catalogue from YAML ([`venues`]).

pub mod app_config;
pub mod config;
pub mod error;
pub mod numeric;
pub mod text;
pub mod types;
pub mod venues;

pub use app_config::{AppConfig, RenderReadiness};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use types::{
    CanonicalInvoice, Credential, InvoiceSummary, JobStatusRecord, PendingInvoiceRecord,
};
pub use venues::{
    load_venues, resolve_credential, JobColumns, PortalFlavor, VenueConfig, VenuePaths,
    VenuesFile,
};
