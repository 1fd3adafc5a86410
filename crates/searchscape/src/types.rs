//! Shared constants and the error taxonomy for SearchScape operations.

/// Default base URL of the image-search provider.
pub const DEFAULT_UNSPLASH_URL: &str = "https://api.unsplash.com";

/// Default base URL of the model-inference provider.
pub const DEFAULT_HF_URL: &str = "https://api-inference.huggingface.co";

/// Default per-request timeout for outbound calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while fetching or transforming images.
#[derive(thiserror::Error, Debug)]
pub enum SearchScapeError {
    /// A required argument is missing or has an unrecognized value.
    #[error("{0}")]
    Validation(String),

    /// An upstream provider returned a non-success status or a malformed body,
    /// or could not be reached.
    #[error("{0}")]
    Upstream(String),

    /// The operation needs state that has not been established yet.
    #[error("{0}")]
    Precondition(String),
}

impl SearchScapeError {
    /// Short category name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchScapeError::Validation(_) => "validation",
            SearchScapeError::Upstream(_) => "upstream",
            SearchScapeError::Precondition(_) => "precondition",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SearchScapeError::Validation(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, SearchScapeError::Upstream(_))
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, SearchScapeError::Precondition(_))
    }
}

/// Convenience result type.
pub type SearchScapeResult<T> = Result<T, SearchScapeError>;
