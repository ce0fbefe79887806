//! Error types for markdown deck building.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a deck document or building output.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The document contained no recognizable slide headers.
    #[error("No slide headers found in document")]
    NoSlidesFound,

    /// A renderer operation failed while building the deck.
    #[error("Render error: {0}")]
    Render(String),

    /// The final document could not be committed to disk.
    #[error("Failed to save document: {0}")]
    SaveFailed(String),
}
