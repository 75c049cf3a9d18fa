//! HS256 token issuing and validation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use esgm_core::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{AuthConfig, AuthError, AuthenticatedUser, TokenValidator};

/// JWT claims carried by ESGM access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// The user's primary key.
    pub user_id: UserId,
    /// The user's email at issue time.
    pub email: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at, seconds since the epoch.
    pub iat: u64,
    /// Expiry, seconds since the epoch.
    pub exp: u64,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        AuthenticatedUser {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Keys for `secret`; tokens are stamped with `issuer` and live for `ttl`.
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    /// The issuer stamped into new tokens.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// How long new tokens stay valid.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for the given user, valid from now.
    pub fn issue(&self, user_id: UserId, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, jsonwebtoken::get_current_timestamp())
    }

    /// Sign a token as if issued at `issued_at` (seconds since the epoch).
    pub fn issue_at(
        &self,
        user_id: UserId,
        email: &str,
        issued_at: u64,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl.as_secs()),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Verify signature, expiry and issuer, returning the claims.
    pub fn verify(&self, token: &str, issuer: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature(e.to_string()),
                _ => AuthError::InvalidFormat(e.to_string()),
            })
    }
}

/// [`TokenValidator`] backed by [`JwtKeys`].
#[derive(Debug, Clone)]
pub struct JwtValidator {
    keys: JwtKeys,
}

impl JwtValidator {
    /// Validate tokens with `keys`.
    pub fn new(keys: JwtKeys) -> Self {
        Self { keys }
    }
}

impl TokenValidator for JwtValidator {
    fn validate(
        &self,
        token: &str,
        config: &AuthConfig,
    ) -> Pin<Box<dyn Future<Output = Result<AuthenticatedUser, AuthError>> + Send + '_>> {
        let result = self
            .keys
            .verify(token, &config.issuer)
            .map(AuthenticatedUser::from);
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(b"test-secret", "esgm", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();
        let token = keys.issue(42, "ada@example.com").unwrap();
        let claims = keys.verify(&token, "esgm").unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_claims_use_camel_case() {
        let token = keys().issue(1, "a@b.c").unwrap();
        let claims = keys().verify(&token, "esgm").unwrap();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["iss"], "esgm");
    }

    #[test]
    fn test_expired_token() {
        let keys = keys();
        let long_ago = jsonwebtoken::get_current_timestamp() - 7200;
        let token = keys.issue_at(1, "a@b.c", long_ago).unwrap();
        assert!(matches!(keys.verify(&token, "esgm"), Err(AuthError::Expired)));
    }

    #[test]
    fn test_wrong_issuer() {
        let keys = keys();
        let token = keys.issue(1, "a@b.c").unwrap();
        assert!(matches!(
            keys.verify(&token, "someone-else"),
            Err(AuthError::InvalidIssuer)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = keys().issue(1, "a@b.c").unwrap();
        let other = JwtKeys::new(b"another-secret", "esgm", Duration::from_secs(3600));
        assert!(matches!(
            other.verify(&token, "esgm"),
            Err(AuthError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_malformed_token() {
        let err = keys().verify("not.a.jwt", "esgm").unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.public_message(), "Invalid token");
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", keys());
        assert!(rendered.contains("esgm"));
        assert!(!rendered.contains("test-secret"));
    }

    #[tokio::test]
    async fn test_validator_yields_user() {
        let keys = keys();
        let token = keys.issue(9, "v@example.com").unwrap();
        let validator = JwtValidator::new(keys);
        let user = validator
            .validate(&token, &AuthConfig::new("esgm"))
            .await
            .unwrap();
        assert_eq!(user.user_id, 9);
        assert_eq!(user.email, "v@example.com");
    }
}
