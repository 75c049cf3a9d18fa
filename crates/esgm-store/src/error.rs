//! Error types for esgm-store

use rusqlite::ffi;
use thiserror::Error;

/// Result type alias for esgm-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in esgm-store
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// SQLite error not covered by a more specific variant
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A UNIQUE constraint rejected the write
    #[error("Duplicate {0}")]
    Duplicate(String),

    /// A FOREIGN KEY constraint rejected the write
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// JSON column could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking task running the query failed
    #[error("Database task failed: {0}")]
    Task(String),

    /// Error from esgm-core
    #[error("Core error: {0}")]
    Core(#[from] esgm_core::Error),
}

impl Error {
    /// Classify constraint violations; everything else stays `Sqlite`.
    pub(crate) fn from_write(err: rusqlite::Error, what: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, _) = err {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Error::Duplicate(what.to_string());
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Error::InvalidReference(what.to_string());
                }
                _ => {}
            }
        }
        Error::Sqlite(err)
    }

    /// Whether this is [`Error::Duplicate`].
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Error::Duplicate(_))
    }

    /// Whether this is [`Error::InvalidReference`].
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Error::InvalidReference(_))
    }
}
