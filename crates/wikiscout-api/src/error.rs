use thiserror::Error;

/// Result type for Wikipedia API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors from the MediaWiki Action API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Page not found: {title}")]
    PageMissing { title: String },

    #[error("Unexpected response shape: {0}")]
    BadResponse(String),
}
