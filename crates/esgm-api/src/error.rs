//! Error types for esgm-api

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use esgm_core::Envelope;
use http::StatusCode;
use thiserror::Error;

/// Result type alias for esgm-api startup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop the server from starting or running
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from esgm-core
    #[error("Core error: {0}")]
    Core(#[from] esgm_core::Error),

    /// Error from esgm-store
    #[error("Storage error: {0}")]
    Store(#[from] esgm_store::Error),

    /// Listener could not be bound or served
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A request failure, rendered as the JSON envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 400
    #[error("{0}")]
    BadRequest(String),

    /// 401
    #[error("{0}")]
    Unauthorized(String),

    /// 403
    #[error("{0}")]
    Forbidden(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 503, stamped like the health check it answers
    #[error("{0}")]
    Unavailable(String),

    /// 500. `detail` is the underlying error, present only in development.
    #[error("{message}")]
    Internal {
        /// Handler-specific message
        message: String,
        /// Underlying error text
        detail: Option<String>,
    },
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<esgm_core::Error> for ApiError {
    fn from(err: esgm_core::Error) -> Self {
        if err.is_validation() {
            ApiError::BadRequest(err.to_string())
        } else {
            tracing::error!(error = %err, "Unexpected core error in request");
            ApiError::Internal {
                message: "Request failed".to_string(),
                detail: None,
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            ApiError::Internal { message, detail } => {
                Envelope::<()>::failure(message).with_error(detail)
            }
            ApiError::Unavailable(message) => Envelope::<()>::failure(message).stamped(),
            other => Envelope::<()>::failure(other.to_string()),
        };
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError =
            esgm_core::Error::validation_field("email", "Please provide a valid email").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Please provide a valid email");
    }

    #[test]
    fn test_config_error_is_internal() {
        let err: ApiError = esgm_core::Error::config("boom").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_envelope() {
        let resp = ApiError::NotFound("Project not found".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Project not found");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_internal_detail_included_when_present() {
        let resp = ApiError::Internal {
            message: "Failed to get projects".into(),
            detail: Some("database is locked".into()),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body(resp).await;
        assert_eq!(json["message"], "Failed to get projects");
        assert_eq!(json["error"], "database is locked");
    }

    #[tokio::test]
    async fn test_unavailable_is_stamped_503() {
        let resp = ApiError::Unavailable("Database unavailable".into()).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Database unavailable");
        assert!(json["timestamp"].is_string());
    }
}
