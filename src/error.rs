//! Error types for the potluck service.

use potluck_search::SearchError;

/// Top-level error type for the recipe service.
#[derive(Debug, thiserror::Error)]
pub enum PotluckError {
    /// Recipe resolution or advice lookup failed.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file could not be parsed or serialized.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, PotluckError>;
