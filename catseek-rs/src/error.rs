use thiserror::Error;

use crate::responder::Category;

/// Errors that can occur in the CatSeek application
#[derive(Error, Debug)]
pub enum CatSeekError {
    /// Error reading, parsing or validating configuration
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A response category has no candidate replies
    #[error("response category '{0}' has no entries")]
    EmptyCategory(Category),

    /// Failed to read from the input stream
    #[error("input error: {0}")]
    InputError(#[source] std::io::Error),

    /// Failed to write to the terminal
    #[error("output error: {0}")]
    OutputError(#[source] std::io::Error),

    /// Shutdown was requested (e.g., via Ctrl+C)
    #[error("shutdown requested")]
    ShutdownRequested,
}

/// Result type alias for CatSeek operations
pub type Result<T> = std::result::Result<T, CatSeekError>;
