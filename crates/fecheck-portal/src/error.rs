use thiserror::Error;

/// Errors from a venue session's HTTP calls.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no candidate path for {resource} returned success (tried {tried:?})")]
    NoCandidateSucceeded {
        resource: String,
        tried: Vec<String>,
    },
}

/// Why a venue login did not produce a usable session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("no credentials configured")]
    MissingCredential,

    #[error("invalid login endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("login endpoint unreachable: {0}")]
    Network(String),

    #[error("login rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("login response carried no token, success flag, or landing page")]
    NoSuccessSignal,
}
