//! Development-only database helpers.

use axum::extract::State;
use esgm_core::Envelope;
use http::StatusCode;

use super::{ApiResult, reply};
use crate::error::ApiError;
use crate::state::AppState;

pub(super) async fn reset_sequences(State(state): State<AppState>) -> ApiResult {
    if !state.is_development() {
        return Err(ApiError::Forbidden(
            "This endpoint is only available in development mode".to_string(),
        ));
    }
    let info = state
        .store
        .reset_sequences()
        .await
        .map_err(|e| state.internal("Failed to reset sequences", e))?;
    tracing::info!("Sequences reset");
    Ok(reply(
        StatusCode::OK,
        Envelope::success(info).with_message("All sequences reset successfully"),
    ))
}

pub(super) async fn sequence_info(State(state): State<AppState>) -> ApiResult {
    let info = state
        .store
        .sequence_info()
        .await
        .map_err(|e| state.internal("Failed to check sequence", e))?;
    Ok(reply(StatusCode::OK, Envelope::success(info)))
}
