//! Venue portal access for fecheck.
//!
//! [`session`] handles login and authenticated requests, [`adapters`] turn
//! venue responses into canonical records, and [`orchestrator`] runs every
//! venue concurrently into a [`RunResults`] map.

pub mod adapters;
pub mod aliases;
pub mod business_day;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod page_text;
pub(crate) mod retry;
pub mod session;

pub use adapters::{FlavorProfile, VenueAdapter};
pub use aliases::{AliasTable, CanonicalField};
pub use business_day::BusinessDay;
pub use error::{AuthFailure, PortalError};
pub use orchestrator::{
    prepare_jobs, run_venues, RunResults, RunSettings, VenueJob, VenueOutcome,
};
pub use session::{
    AuthMethod, LoginContract, LoginEncoding, PortalResponse, SessionClient, SessionSettings,
};
