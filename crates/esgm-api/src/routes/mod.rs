//! Router assembly.

mod auth;
mod dev;
mod health;
mod projects;

use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use esgm_auth::{AuthConfig, AuthLayer};
use esgm_core::{Envelope, ServerConfig};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method, StatusCode};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Handler result: an enveloped response or an enveloped error.
pub(crate) type ApiResult = Result<Response, ApiError>;

pub(crate) fn reply<T: Serialize>(status: StatusCode, envelope: Envelope<T>) -> Response {
    (status, Json(envelope)).into_response()
}

/// The full application router.
pub fn router(state: AppState) -> Router {
    let auth = AuthLayer::new(
        Arc::new(state.validator()),
        AuthConfig::new(state.keys.issuer()),
    );

    let protected = Router::new()
        .route("/api/auth/profile", get(auth::profile))
        .route("/api/projects", get(projects::list).post(projects::create))
        .route("/api/projects/key-issues", get(projects::key_issues))
        .route("/api/projects/stats", get(projects::stats))
        .route(
            "/api/projects/{id}",
            get(projects::show).delete(projects::delete),
        )
        .route("/api/projects/{id}/evaluate", post(projects::evaluate))
        .route_layer(auth);

    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/dev/reset-sequences", post(dev::reset_sequences))
        .route("/api/auth/dev/sequence-info", get(dev::sequence_info));

    let body_limit = state.config.server.body_limit_bytes;
    let cors = cors_layer(&state.config.server);

    public
        .merge(protected)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    match HeaderValue::from_str(&config.cors_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            tracing::warn!(
                origin = %config.cors_origin,
                error = %err,
                "Invalid CORS origin, cross-origin requests will be refused"
            );
            layer
        }
    }
}

async fn not_found() -> Response {
    reply(
        StatusCode::NOT_FOUND,
        Envelope::<()>::failure("API endpoint not found"),
    )
}

/// Parse the `{id}` path segment.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid project ID".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ApiError::BadRequest(_))));
        assert!(parse_id("").is_err());
        assert!(parse_id("1.5").is_err());
    }

    #[test]
    fn test_bad_cors_origin_does_not_panic() {
        let config = ServerConfig {
            cors_origin: "bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        let _layer = cors_layer(&config);
    }
}
