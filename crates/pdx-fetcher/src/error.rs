use thiserror::Error;

/// Failures while acquiring a product page.
///
/// Each case is its own variant so callers can tell a dead host from a bad
/// status from a page that is not HTML.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch product page: invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to fetch product page: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch product page: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error(
        "Failed to fetch product page: expected HTML content but got {}",
        .content_type.as_deref().unwrap_or("no Content-Type header")
    )]
    NotHtml {
        url: String,
        content_type: Option<String>,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// HTTP status code, for [`FetchError::Status`] only.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The URL the failed fetch was for.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::NotHtml { url, .. } => Some(url),
            Self::Client(_) => None,
        }
    }
}
