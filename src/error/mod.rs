use thiserror::Error;

/// Failures surfaced to the calling front-end.
///
/// Malformed or missing upstream fields are never reported here; the adapter
/// substitutes defaults for those.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("API error: {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Movie not found: {message}")]
    NotFound { message: String },

    #[error("OMDb API key missing (set omdb.apikey or OMDB_API_KEY)")]
    MissingApiKey,

    #[error("invalid OMDb base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("favorites file {path}: {reason}")]
    Favorites { path: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MovieError>;
