//! Error types for unpaper library.

use std::io;
use thiserror::Error;

/// Result type alias for unpaper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while parsing or rendering a paper.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input exceeds the configured size limit.
    #[error("Input is {size} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge {
        /// Size of the rejected input in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Catastrophic failure while building or walking the markup tree.
    #[error("Markup parsing error: {0}")]
    Parse(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}
