use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("{0}")]
    Mock(String),
}

/// Why a single schema.org accessor produced nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("No Recipe schema found on page")]
    NoSchema,

    #[error("Missing field: {0}")]
    Missing(&'static str),

    #[error("Unexpected shape for {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Failure of the URL-to-recipe adapter as a whole.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The caller gave us something we cannot turn into a recipe: a malformed
    /// URL, an unreachable page, or a page without the minimum recipe data.
    #[error("{0}")]
    InvalidInput(String),

    /// Anything that went wrong outside the page fetch and parse itself.
    #[error("Failed to scrape recipe: {0}")]
    ExtractionFailure(String),
}

impl ScrapeError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ScrapeError::InvalidInput(_))
    }
}
