//! Venue catalogue loaded from `config/venues.yaml`.
//!
//! The order of entries in the file is the display order of the composed
//! report.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Credential;
use crate::ConfigError;

/// Backend family a venue runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalFlavor {
    /// JSON API with bearer-token login and OData-style list endpoints.
    Gopass,
    /// Server-rendered console with form login and a cookie session.
    Facturapark,
}

impl std::fmt::Display for PortalFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortalFlavor::Gopass => write!(f, "gopass"),
            PortalFlavor::Facturapark => write!(f, "facturapark"),
        }
    }
}

/// Column layout used when displaying a venue's job table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobColumns {
    #[default]
    Basic,
    /// Adds the enabled flag and raise-events counter with relabelled headers.
    Extended,
}

/// Candidate paths per logical resource, tried in the listed order.
///
/// Empty lists mean "use the flavour's default paths".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenuePaths {
    #[serde(default)]
    pub login: Vec<String>,
    #[serde(default)]
    pub pending: Vec<String>,
    #[serde(default)]
    pub jobs: Vec<String>,
    #[serde(default)]
    pub invoices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    pub key: String,
    pub display_name: String,
    pub flavor: PortalFlavor,
    pub base_url: String,
    /// Prefix of the `<PREFIX>_USERNAME` / `<PREFIX>_PASSWORD` env vars.
    pub credentials_env: String,
    /// Name searched for in rendered pages when no structured field exists.
    pub entity_marker: Option<String>,
    #[serde(default)]
    pub paths: VenuePaths,
    /// Overrides the flavour's pending-count aliases, highest priority first.
    #[serde(default)]
    pub pending_aliases: Vec<String>,
    #[serde(default)]
    pub job_columns: JobColumns,
}

impl VenueConfig {
    /// Marker used for text scanning; falls back to the upper-cased key.
    #[must_use]
    pub fn marker(&self) -> String {
        self.entity_marker
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.key.to_uppercase())
    }
}

#[derive(Debug, Deserialize)]
pub struct VenuesFile {
    pub venues: Vec<VenueConfig>,
}

/// Load and validate the venue catalogue from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_venues(path: &Path) -> Result<VenuesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::VenuesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let venues_file: VenuesFile = serde_yaml::from_str(&content)?;
    validate_venues(&venues_file)?;

    Ok(venues_file)
}

fn validate_venues(venues_file: &VenuesFile) -> Result<(), ConfigError> {
    if venues_file.venues.is_empty() {
        return Err(ConfigError::Validation(
            "venues file declares no venues".to_string(),
        ));
    }

    let mut seen_keys = HashSet::new();

    for venue in &venues_file.venues {
        if venue.key.trim().is_empty() || venue.display_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "venue key and display_name must be non-empty".to_string(),
            ));
        }

        if !seen_keys.insert(venue.key.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate venue key: '{}'",
                venue.key
            )));
        }

        if !(venue.base_url.starts_with("https://") || venue.base_url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has base_url '{}'; expected an http(s) URL",
                venue.key, venue.base_url
            )));
        }

        if venue.credentials_env.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "venue '{}' has an empty credentials_env prefix",
                venue.key
            )));
        }
    }

    Ok(())
}

/// Resolve a venue's credential through `lookup` (normally `std::env::var`).
///
/// Returns `None` when either half is missing or blank.
pub fn resolve_credential<F>(venue: &VenueConfig, lookup: F) -> Option<Credential>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let prefix = venue.credentials_env.trim().to_uppercase();
    let identifier = lookup(&format!("{prefix}_USERNAME")).ok()?;
    let secret = lookup(&format!("{prefix}_PASSWORD")).ok()?;
    if identifier.trim().is_empty() || secret.is_empty() {
        return None;
    }
    Some(Credential::new(identifier.trim(), secret))
}

#[cfg(test)]
#[path = "venues_test.rs"]
mod tests;
