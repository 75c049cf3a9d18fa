//! Error types for esgm-cli

use thiserror::Error;

/// Result type alias for esgm-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in esgm-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from esgm-core (configuration, validation)
    #[error(transparent)]
    Core(#[from] esgm_core::Error),

    /// Error from esgm-store
    #[error("Database error: {0}")]
    Store(#[from] esgm_store::Error),

    /// Error from esgm-api
    #[error("Server error: {0}")]
    Api(#[from] esgm_api::Error),
}
