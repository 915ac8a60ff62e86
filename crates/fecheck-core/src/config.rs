use crate::app_config::{AppConfig, RenderReadiness};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("FECHECK_LOG_LEVEL", "info");
    let venues_path = PathBuf::from(or_default("FECHECK_VENUES_PATH", "./config/venues.yaml"));

    let request_timeout_secs = parse_u64("FECHECK_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "FECHECK_REQUEST_TIMEOUT_SECS",
            "timeout must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("FECHECK_USER_AGENT", "Mozilla/5.0 (fecheck)");
    let max_concurrent_venues = parse_usize("FECHECK_MAX_CONCURRENT_VENUES", "4")?;
    let max_retries = parse_u32("FECHECK_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("FECHECK_RETRY_BACKOFF_BASE_MS", "500")?;
    let retry_max_delay_ms = parse_u64("FECHECK_RETRY_MAX_DELAY_MS", "30000")?;
    if retry_max_delay_ms < retry_backoff_base_ms {
        return Err(invalid(
            "FECHECK_RETRY_MAX_DELAY_MS",
            format!(
                "cap {retry_max_delay_ms} ms is below the {retry_backoff_base_ms} ms base delay"
            ),
        ));
    }

    let offset_raw = or_default("FECHECK_BUSINESS_UTC_OFFSET_HOURS", "-5");
    let business_utc_offset_hours = offset_raw
        .trim()
        .parse::<i32>()
        .map_err(|e| invalid("FECHECK_BUSINESS_UTC_OFFSET_HOURS", e.to_string()))?;
    if !(-12..=14).contains(&business_utc_offset_hours) {
        return Err(invalid(
            "FECHECK_BUSINESS_UTC_OFFSET_HOURS",
            format!("offset {business_utc_offset_hours} is outside -12..=14"),
        ));
    }

    let dashboard_url = optional("FECHECK_DASHBOARD_URL");
    let render_service_url = optional("FECHECK_RENDER_SERVICE_URL");
    let render_wait_secs = parse_u64("FECHECK_RENDER_WAIT_SECS", "10")?;
    let render_readiness = parse_readiness(&or_default("FECHECK_RENDER_READINESS", "fixed"))
        .ok_or_else(|| {
            invalid(
                "FECHECK_RENDER_READINESS",
                "expected 'fixed' or 'poll'".to_string(),
            )
        })?;
    let render_timeout_secs = parse_u64("FECHECK_RENDER_TIMEOUT_SECS", "45")?;

    Ok(AppConfig {
        log_level,
        venues_path,
        request_timeout_secs,
        user_agent,
        max_concurrent_venues,
        max_retries,
        retry_backoff_base_ms,
        retry_max_delay_ms,
        business_utc_offset_hours,
        dashboard_url,
        render_service_url,
        render_wait_secs,
        render_readiness,
        render_timeout_secs,
    })
}

fn parse_readiness(s: &str) -> Option<RenderReadiness> {
    match s.trim().to_ascii_lowercase().as_str() {
        "fixed" => Some(RenderReadiness::FixedDelay),
        "poll" => Some(RenderReadiness::PollUntilText),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn build_app_config_defaults_with_empty_env() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.venues_path.to_str(), Some("./config/venues.yaml"));
        assert_eq!(cfg.request_timeout_secs, 15);
        assert_eq!(cfg.user_agent, "Mozilla/5.0 (fecheck)");
        assert_eq!(cfg.max_concurrent_venues, 4);
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.retry_backoff_base_ms, 500);
        assert_eq!(cfg.retry_max_delay_ms, 30_000);
        assert_eq!(cfg.business_utc_offset_hours, -5);
        assert!(cfg.dashboard_url.is_none());
        assert!(cfg.render_service_url.is_none());
        assert_eq!(cfg.render_wait_secs, 10);
        assert_eq!(cfg.render_readiness, RenderReadiness::FixedDelay);
        assert_eq!(cfg.render_timeout_secs, 45);
    }

    #[test]
    fn build_app_config_reads_overrides() {
        let mut map = HashMap::new();
        map.insert("FECHECK_MAX_CONCURRENT_VENUES", "2");
        map.insert("FECHECK_BUSINESS_UTC_OFFSET_HOURS", "-3");
        map.insert("FECHECK_RENDER_READINESS", "POLL");
        map.insert("FECHECK_DASHBOARD_URL", "https://reports.example/view?r=abc");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.max_concurrent_venues, 2);
        assert_eq!(cfg.business_utc_offset_hours, -3);
        assert_eq!(cfg.render_readiness, RenderReadiness::PollUntilText);
        assert_eq!(
            cfg.dashboard_url.as_deref(),
            Some("https://reports.example/view?r=abc")
        );
    }

    #[test]
    fn retry_delay_cap_is_configurable() {
        let mut map = HashMap::new();
        map.insert("FECHECK_RETRY_BACKOFF_BASE_MS", "200");
        map.insert("FECHECK_RETRY_MAX_DELAY_MS", "1500");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.retry_backoff_base_ms, 200);
        assert_eq!(cfg.retry_max_delay_ms, 1500);
    }

    #[test]
    fn retry_delay_cap_below_base_is_rejected() {
        let mut map = HashMap::new();
        map.insert("FECHECK_RETRY_BACKOFF_BASE_MS", "2000");
        map.insert("FECHECK_RETRY_MAX_DELAY_MS", "1000");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FECHECK_RETRY_MAX_DELAY_MS"
        ));
    }

    #[test]
    fn blank_optional_values_are_treated_as_absent() {
        let mut map = HashMap::new();
        map.insert("FECHECK_RENDER_SERVICE_URL", "   ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.render_service_url.is_none());
    }

    #[test]
    fn build_app_config_rejects_non_numeric_timeout() {
        let mut map = HashMap::new();
        map.insert("FECHECK_REQUEST_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FECHECK_REQUEST_TIMEOUT_SECS"),
            "expected InvalidEnvVar(FECHECK_REQUEST_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_timeout() {
        let mut map = HashMap::new();
        map.insert("FECHECK_REQUEST_TIMEOUT_SECS", "0");
        assert!(build_app_config(lookup_from_map(&map)).is_err());
    }

    #[test]
    fn build_app_config_rejects_out_of_range_offset() {
        let mut map = HashMap::new();
        map.insert("FECHECK_BUSINESS_UTC_OFFSET_HOURS", "-15");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FECHECK_BUSINESS_UTC_OFFSET_HOURS"),
            "got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_unknown_readiness_mode() {
        let mut map = HashMap::new();
        map.insert("FECHECK_RENDER_READINESS", "eventually");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FECHECK_RENDER_READINESS"),
            "got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_dashboard_url() {
        let mut map = HashMap::new();
        map.insert("FECHECK_DASHBOARD_URL", "https://reports.example/view?r=secret-key");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[redacted]"));
    }
}
