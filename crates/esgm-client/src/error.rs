//! Error types for esgm-client

use thiserror::Error;

/// Result type alias for esgm-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in esgm-client
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport or decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `message` from the response envelope
        message: String,
    },

    /// A successful response carried no `data`
    #[error("Response to {0} had no data")]
    MissingData(String),
}

impl Error {
    /// Status code of an [`Error::Api`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
