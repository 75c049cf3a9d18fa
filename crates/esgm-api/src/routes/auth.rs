//! Registration, login, and profile.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use esgm_auth::{AuthenticatedUser, password};
use esgm_core::validation::{validate_login, validate_registration};
use esgm_core::{AuthResponse, Envelope, LoginRequest, RegisterRequest};
use http::StatusCode;

use super::{ApiResult, reply};
use crate::error::ApiError;
use crate::state::AppState;

const NO_ACCOUNT: &str = "No account found with this email address.";
const BAD_CREDENTIALS: &str = "Invalid email or password. Please check your credentials.";

pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let new_user = validate_registration(&request)?;

    let cost = state.config.auth.bcrypt_cost;
    let plain = new_user.password;
    let hash = tokio::task::spawn_blocking(move || password::hash(&plain, cost))
        .await
        .map_err(|e| state.internal("Registration failed", e))?
        .map_err(|e| state.internal("Registration failed", e))?;

    let user = match state
        .store
        .create_user(
            &new_user.email,
            &new_user.first_name,
            &new_user.last_name,
            &hash,
        )
        .await
    {
        Ok(user) => user,
        Err(err) if err.is_duplicate() => {
            return Err(ApiError::BadRequest(
                "An account with this email already exists".to_string(),
            ));
        }
        Err(err) => return Err(state.internal("Registration failed", err)),
    };

    let token = state
        .keys
        .issue(user.user_id, &user.email)
        .map_err(|e| state.internal("Registration failed", e))?;
    tracing::info!(user_id = user.user_id, "User registered");

    Ok(reply(
        StatusCode::CREATED,
        Envelope::success(AuthResponse {
            user: user.to_public(),
            token,
        })
        .with_message("User registered successfully"),
    ))
}

pub(super) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let credentials = validate_login(&request)?;

    let record = state
        .store
        .find_user_by_email(&credentials.email)
        .await
        .map_err(|e| state.internal("Login failed", e))?
        .ok_or_else(|| ApiError::Unauthorized(NO_ACCOUNT.to_string()))?;

    let plain = credentials.password;
    let stored = record.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || password::verify(&plain, &stored))
        .await
        .map_err(|e| state.internal("Login failed", e))?
        .map_err(|e| state.internal("Login failed", e))?;
    if !matches {
        tracing::debug!(user_id = record.user.user_id, "Password mismatch");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let user = record.user;
    let token = state
        .keys
        .issue(user.user_id, &user.email)
        .map_err(|e| state.internal("Login failed", e))?;
    tracing::info!(user_id = user.user_id, "User logged in");

    Ok(reply(
        StatusCode::OK,
        Envelope::success(AuthResponse {
            user: user.to_public(),
            token,
        })
        .with_message("Login successful"),
    ))
}

pub(super) async fn profile(State(state): State<AppState>, auth: AuthenticatedUser) -> ApiResult {
    let user = state
        .store
        .get_user(auth.user_id)
        .await
        .map_err(|e| state.internal("Failed to get user profile", e))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(reply(StatusCode::OK, Envelope::success(user.to_public())))
}
