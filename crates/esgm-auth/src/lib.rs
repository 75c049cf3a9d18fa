//! Authentication primitives for ESGM.
//!
//! Provides:
//! - [`AuthenticatedUser`]: identity extracted from a validated token
//! - [`TokenValidator`]: trait for async token validation
//! - [`AuthLayer`] / [`AuthService`]: Tower middleware parameterised over `TokenValidator`
//! - [`JwtKeys`] / [`JwtValidator`]: HS256 token issuing and validation
//! - [`password`]: bcrypt hashing
//! - [`AuthConfig`]: claims the layer requires
//! - [`AuthError`]: auth-specific error types

mod error;
mod jwt;
mod middleware;
pub mod password;
mod user;

pub use error::AuthError;
pub use jwt::{Claims, JwtKeys, JwtValidator};
pub use middleware::{AuthLayer, AuthService, CHALLENGE, unauthorized_response};
pub use user::{AuthenticatedUser, user_from_parts};

/// Claims the middleware requires of every token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    /// Required `iss` claim.
    pub issuer: String,
}

impl AuthConfig {
    /// Require tokens issued by `issuer`.
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
        }
    }
}

/// Trait for validating tokens and extracting user identity.
///
/// The middleware calls `validate()` with the bearer token and inserts
/// the returned user into the request extensions.
pub trait TokenValidator: Send + Sync + 'static {
    /// Validate a token and return the authenticated user.
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>,
    >;
}
