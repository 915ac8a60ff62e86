//! Small text helpers shared by the report and the venue view.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use fecheck_portal::AuthFailure;

/// Shown when a venue reports no job timestamp.
pub(crate) const NO_DATE: &str = "Sin fecha";

/// Formats a backend timestamp as `dd/mm/yyyy HH:MM`.
///
/// RFC 3339 values are shifted to `offset_hours`; naive values are printed
/// as given; anything else is returned verbatim.
pub(crate) fn job_timestamp(raw: &str, offset_hours: i32) -> String {
    const OUT: &str = "%d/%m/%Y %H:%M";
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return match FixedOffset::east_opt(offset_hours * 3600) {
            Some(offset) => parsed.with_timezone(&offset).format(OUT).to_string(),
            None => parsed.format(OUT).to_string(),
        };
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map_or_else(|| trimmed.to_string(), |naive| naive.format(OUT).to_string())
}

/// Spanish explanation of a login failure for the report.
pub(crate) fn login_failure(reason: &AuthFailure) -> String {
    match reason {
        AuthFailure::MissingCredential => "credenciales no configuradas".to_string(),
        AuthFailure::InvalidEndpoint(_) => "dirección de inicio de sesión inválida".to_string(),
        AuthFailure::Network(_) => "portal sin conexión".to_string(),
        AuthFailure::Rejected { status } => format!("acceso rechazado, HTTP {status}"),
        AuthFailure::NoSuccessSignal => "respuesta de inicio de sesión no reconocida".to_string(),
    }
}
