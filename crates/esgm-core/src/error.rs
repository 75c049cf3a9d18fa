//! Error types for the ESGM core library.

use std::path::{Path, PathBuf};

/// Errors raised by validation, configuration loading, and serialization.
///
/// The enum is `#[non_exhaustive]`; downstream crates match the variants
/// they handle and fall through on the rest.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Request payload failed validation.
    ///
    /// The message is user-facing and is returned verbatim by the API.
    #[error("{message}")]
    Validation {
        /// Field that failed validation, when known
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error, optionally tied to a path
    #[error("I/O error{}: {source}", at_path(.path))]
    Io {
        /// Path involved in the failing operation
        path: Option<PathBuf>,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn at_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

/// Convenience `Result` alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

impl Error {
    /// Creates a validation error without a field name.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a validation error for a named field.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path that caused it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Returns `true` for errors caused by client input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_is_message_only() {
        let err = Error::validation("Project name is required");
        assert_eq!(err.to_string(), "Project name is required");
        assert!(err.is_validation());
    }

    #[test]
    fn test_validation_error_with_field() {
        let err = Error::validation_field("email", "Please provide a valid email");
        let Error::Validation { field, message } = err else {
            unreachable!("Expected Validation error variant");
        };
        assert_eq!(field, Some("email".to_string()));
        assert_eq!(message, "Please provide a valid email");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("JWT secret must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: JWT secret must not be empty"
        );
        assert!(!err.is_validation());
    }

    #[test]
    fn test_io_error_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io_with_path(io, "/tmp/esgm.toml");
        let text = err.to_string();
        assert!(text.contains("/tmp/esgm.toml"));
        assert!(text.contains("missing"));
    }

    #[test]
    fn test_io_error_without_path() {
        let io = std::io::Error::other("disk full");
        let err: Error = io.into();
        assert_eq!(err.to_string(), "I/O error: disk full");
    }

    #[test]
    fn test_serde_error_converts() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: Error = serde_err.into();
        assert!(err.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_error_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
