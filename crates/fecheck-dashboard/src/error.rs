use thiserror::Error;

/// Errors from obtaining a rendered dashboard page.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("render service returned HTTP {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid render service URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cannot read HTML snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
