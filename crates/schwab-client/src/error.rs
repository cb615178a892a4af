//! Error types for the Schwab client.

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Client error types.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Query string could not be encoded.
    #[error("Query encoding error: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API returned a non-success response. The body is kept verbatim.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No usable access token.
    #[error("Authentication error: {source}")]
    Auth {
        /// Status returned by the token endpoint, when it answered.
        status: Option<u16>,
        /// Underlying token error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Transport failure not originating from reqwest.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Builds an [`Error::Auth`] with no HTTP status.
    pub fn auth(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Auth {
            status: None,
            source: source.into(),
        }
    }

    /// Returns the HTTP status code for [`Error::Api`] errors, or the token
    /// endpoint's status for [`Error::Auth`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Auth { status, .. } => *status,
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
