use pdx_fetcher::FetchError;
use thiserror::Error;

/// Failures talking to the generation service itself.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model service request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("model service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model service response could not be decoded: {0}")]
    Decode(String),

    #[error("failed to build model HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Everything that can abort [`ProductExtractor::extract_product`](crate::ProductExtractor::extract_product).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page could not be acquired. Displays the fetcher's message as-is.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// The model answered but produced no usable record.
    ///
    /// `detail` says why (refusal, empty content, schema mismatch) and is
    /// logged; the display message is fixed.
    #[error("Failed to extract product")]
    Extraction { detail: String },
}

impl ExtractError {
    /// Stable machine-readable code for the failing stage.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch_failed",
            Self::Model(_) => "model_error",
            Self::Extraction { .. } => "extraction_failed",
        }
    }

    pub(crate) fn extraction(detail: impl Into<String>) -> Self {
        Self::Extraction {
            detail: detail.into(),
        }
    }
}
