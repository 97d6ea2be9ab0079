use thiserror::Error;

/// Errors surfaced to callers of the import pipeline
#[derive(Error, Debug)]
pub enum ImportError {
    /// Required input (URL or image) was missing or blank; nothing was attempted
    #[error("Invalid import request: {0}")]
    Validation(String),

    /// Every applicable extraction strategy came back empty
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The canonical vocabulary snapshot could not be loaded
    #[error("Vocabulary unavailable: {0}")]
    Vocabulary(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The configured generative service could not be set up
    #[error("Provider setup failed: {0}")]
    Provider(#[from] LlmError),

    /// Reading a local image or vocabulary file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a generative service. Call failures never reach callers:
/// extractors turn them into an empty result so the next strategy can run.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API credential configured")]
    NotConfigured,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(e: serde_json::Error) -> Self {
        LlmError::ParseError(e.to_string())
    }
}

/// Failure to retrieve a source page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    Status(u16),
}
