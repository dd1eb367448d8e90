//! Error types for devcard

use thiserror::Error;

/// Main error type for the devcard library
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure talking to an upstream API
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// Upstream body did not match the expected shape
    #[error("unexpected response from {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Headless browser could not launch, navigate or capture
    #[error("browser error: {0}")]
    Browser(String),
}

/// Result type alias for devcard
pub type Result<T> = std::result::Result<T, Error>;
