//! Auth-specific error types.

/// Errors that can occur during authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header or bearer token present.
    #[error("missing authentication token")]
    MissingToken,

    /// Token format is invalid (not a valid JWT).
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// JWT signature verification failed.
    #[error("invalid token signature: {0}")]
    InvalidSignature(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// Token was issued by someone else.
    #[error("invalid issuer")]
    InvalidIssuer,

    /// Token could not be signed.
    #[error("failed to create token: {0}")]
    TokenCreation(String),

    /// bcrypt failed to hash or verify a password.
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// Whether this error should result in a 401 (vs. a 500).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidFormat(_)
                | AuthError::InvalidSignature(_)
                | AuthError::Expired
                | AuthError::InvalidIssuer
        )
    }

    /// Message safe to return to clients; details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Access token required",
            AuthError::Expired => "Token has expired",
            AuthError::InvalidFormat(_)
            | AuthError::InvalidSignature(_)
            | AuthError::InvalidIssuer => "Invalid token",
            AuthError::TokenCreation(_) | AuthError::PasswordHash(_) => "Authentication failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let e = AuthError::MissingToken;
        assert_eq!(e.to_string(), "missing authentication token");
    }

    #[test]
    fn test_auth_error_format_display() {
        let e = AuthError::InvalidFormat("InvalidToken".to_string());
        assert_eq!(e.to_string(), "invalid token format: InvalidToken");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AuthError::MissingToken.is_client_error());
        assert!(AuthError::Expired.is_client_error());
        assert!(AuthError::InvalidIssuer.is_client_error());
        // Hashing and signing failures are server-side
        assert!(!AuthError::PasswordHash("err".into()).is_client_error());
        assert!(!AuthError::TokenCreation("err".into()).is_client_error());
    }

    #[test]
    fn test_public_message_hides_detail() {
        let e = AuthError::InvalidSignature("signature mismatch for key abc".into());
        assert_eq!(e.public_message(), "Invalid token");
        assert_eq!(AuthError::Expired.public_message(), "Token has expired");
    }
}
