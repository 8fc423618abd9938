//! Error types for the page builder

use thiserror::Error;

/// Result type alias for page builder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the crate's boundaries.
///
/// The layout core (extraction, hydration, rendering, editing) is total and
/// never produces these; they come from decoding, fetching and storage.
#[derive(Error, Debug)]
pub enum Error {
    /// The serialized layout configuration is not valid JSON for a layout
    #[error("Failed to decode layout configuration: {0}")]
    Decode(#[from] serde_json::Error),

    /// Talking to the content source failed
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Editor state could not be stored or restored
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "graphql")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}
