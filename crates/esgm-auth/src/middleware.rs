//! Bearer-token middleware for the protected routes.
//!
//! [`AuthLayer`] wraps a router with [`AuthService`], which resolves the
//! `Authorization` header through a [`TokenValidator`] and either forwards
//! the request with an [`AuthenticatedUser`] extension or answers 401 itself.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Json;
use axum::body::Body;
use axum::response::{IntoResponse, Response};
use esgm_core::Envelope;
use http::{HeaderMap, Request, StatusCode, header};
use tower::{Layer, Service};

use crate::{AuthConfig, AuthError, AuthenticatedUser, TokenValidator};

/// `WWW-Authenticate` value sent with every 401.
pub const CHALLENGE: &str = r#"Bearer realm="esgm""#;

/// Layer that puts [`AuthService`] in front of a service.
pub struct AuthLayer<V> {
    validator: Arc<V>,
    config: AuthConfig,
}

impl<V> Clone for AuthLayer<V> {
    fn clone(&self) -> Self {
        Self {
            validator: Arc::clone(&self.validator),
            config: self.config.clone(),
        }
    }
}

impl<V: TokenValidator> AuthLayer<V> {
    /// Authenticate with `validator`, requiring the claims in `config`.
    pub fn new(validator: Arc<V>, config: AuthConfig) -> Self {
        Self { validator, config }
    }
}

impl<V: TokenValidator, S> Layer<S> for AuthLayer<V> {
    type Service = AuthService<V, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            validator: Arc::clone(&self.validator),
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`AuthLayer`].
pub struct AuthService<V, S> {
    inner: S,
    validator: Arc<V>,
    config: AuthConfig,
}

impl<V, S: Clone> Clone for AuthService<V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: Arc::clone(&self.validator),
            config: self.config.clone(),
        }
    }
}

impl<V, S> Service<Request<Body>> for AuthService<V, S>
where
    V: TokenValidator,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        // The clone we leave behind has not been polled ready; take the one that was.
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);
        let validator = Arc::clone(&self.validator);
        let config = self.config.clone();

        Box::pin(async move {
            let user = match authenticate(validator.as_ref(), &config, req.headers()).await {
                Ok(user) => user,
                Err(AuthError::MissingToken) => {
                    log::debug!("Rejected {} without a token", req.uri().path());
                    return Ok(unauthorized_response(
                        AuthError::MissingToken.public_message(),
                    ));
                }
                Err(err) => {
                    log::warn!("Authentication failed: {err}");
                    return Ok(unauthorized_response(err.public_message()));
                }
            };

            log::debug!("User {} authenticated for {}", user.user_id, req.uri().path());
            req.extensions_mut().insert(user);
            let Ok(response) = inner.call(req).await;
            Ok(response.into_response())
        })
    }
}

async fn authenticate<V: TokenValidator>(
    validator: &V,
    config: &AuthConfig,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;
    validator.validate(token, config).await
}

/// The token from `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively; a blank token counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// 401 with the failure envelope and a bearer challenge.
pub fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, CHALLENGE)],
        Json(Envelope::<()>::failure(message)),
    )
        .into_response()
}
