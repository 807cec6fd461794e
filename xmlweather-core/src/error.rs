use thiserror::Error;

/// Errors surfaced by the loader and the extractor.
///
/// Nothing in this crate recovers from these locally; they are handed to the
/// caller as-is.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure, timeout or a non-success HTTP status.
    #[error("Failed to fetch weather feed: {0}")]
    Fetch(String),

    /// The response body is not well-formed XML.
    #[error("Failed to parse weather feed XML: {0}")]
    Parse(String),

    /// An expected node or field is absent from an otherwise well-formed document.
    #[error("Not found in weather feed: {0}")]
    NotFound(String),

    /// Unsupported units or language value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Fetch(err.to_string())
    }
}

impl From<xmltree::ParseError> for WeatherError {
    fn from(err: xmltree::ParseError) -> Self {
        WeatherError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
