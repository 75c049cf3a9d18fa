//! Authenticated user identity and extraction helpers.

use axum::extract::FromRequestParts;
use axum::response::Response;
use esgm_core::UserId;
use serde::{Deserialize, Serialize};

use crate::{AuthError, unauthorized_response};

/// An authenticated user identity, extracted from a validated token.
///
/// Stored in HTTP request extensions by the auth middleware. Handlers take
/// it as an extractor; a request without one is rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The user's primary key (the `userId` claim).
    pub user_id: UserId,
    /// The user's email address.
    pub email: String,
}

/// Extract the `AuthenticatedUser` from HTTP request `Parts`, if present.
pub fn user_from_parts(parts: &http::request::Parts) -> Option<&AuthenticatedUser> {
    parts.extensions.get::<AuthenticatedUser>()
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        user_from_parts(parts)
            .cloned()
            .ok_or_else(|| unauthorized_response(AuthError::MissingToken.public_message()))
    }
}
