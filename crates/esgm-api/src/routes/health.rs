//! Liveness check.

use axum::extract::State;
use esgm_core::Envelope;
use http::StatusCode;

use super::{ApiResult, reply};
use crate::error::ApiError;
use crate::state::AppState;

/// 200 while the database answers, 503 otherwise.
pub(super) async fn health(State(state): State<AppState>) -> ApiResult {
    state.store.ping().await.map_err(|err| {
        tracing::error!(error = %err, "Health check failed");
        ApiError::Unavailable("Database unavailable".to_string())
    })?;
    Ok(reply(
        StatusCode::OK,
        Envelope::<()>::message("ESG Management System API is running").stamped(),
    ))
}
