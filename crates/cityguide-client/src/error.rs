use cityguide_core::FetchError;
use thiserror::Error;

/// Errors returned by [`crate::BackendClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// the request deadline elapsing.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource not found: {url}")]
    NotFound { url: String },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// The backend refused the request and explained why.
    #[error("request rejected with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid rating {0}: expected 1..=5")]
    InvalidRating(u8),

    #[error("invalid photo content type \"{0}\"")]
    InvalidContentType(String),

    #[error(transparent)]
    InvalidInput(#[from] cityguide_core::CoreError),
}

impl From<ClientError> for FetchError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound { url } => FetchError::NotFound(url),
            ClientError::Deserialize { .. } | ClientError::Rejected { .. } => {
                FetchError::InvalidResponseShape(err.to_string())
            }
            other => FetchError::NetworkFailure(other.to_string()),
        }
    }
}
