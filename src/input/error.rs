//! Translation loading errors

use std::time::Duration;

use thiserror::Error;

/// Errors raised while fetching or parsing a translation source
#[derive(Error, Debug)]
pub enum LoadError {
    /// Error when failing to read a translation file
    #[error("Failed to read translation file: {0}")]
    Io(#[from] std::io::Error),
    /// Error when the HTTP request itself fails
    #[error("Failed to fetch translation source: {0}")]
    Http(#[from] reqwest::Error),
    /// Error when the server answers with a non-success status
    #[error("Translation source '{url}' responded with status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },
    /// Error when the source does not answer within the load timeout
    #[error("Translation source timed out after {0:?}")]
    Timeout(Duration),
    /// Error when the document is not valid JSON
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Error when the document is valid JSON but not a translation tree
    #[error("Malformed translation document: {0}")]
    Malformed(String),
    /// Error when not even the fallback language could be populated
    #[error("No translations available for fallback language '{0}'")]
    NoUsableLanguage(String),
}
