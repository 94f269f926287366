//! Common error types for Musicbox

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Musicbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the Musicbox service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Referenced record does not exist
    #[error("Not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Metadata record exists but its backing file is gone
    #[error("Dangling reference: audio {id} points to missing file {}", path.display())]
    DanglingReference { id: i64, path: PathBuf },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a `NotFound` for an entity keyed by any displayable id
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Error::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True for `NotFound` errors
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
