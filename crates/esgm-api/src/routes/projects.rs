//! Project submission, listing, and evaluation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use esgm_auth::AuthenticatedUser;
use esgm_core::validation::validate_project;
use esgm_core::{CreateProjectRequest, Envelope, IssueId, ProjectId, ProjectStatus};
use http::StatusCode;
use serde::Serialize;

use super::{ApiResult, parse_id, reply};
use crate::error::ApiError;
use crate::state::AppState;

/// Body of the 202 returned when an evaluation is (re)started.
#[derive(Debug, Serialize)]
struct EvaluationTriggered {
    project_id: ProjectId,
    status: ProjectStatus,
    evaluator: &'static str,
}

pub(super) async fn list(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult {
    let projects = state
        .store
        .list_projects(user.user_id)
        .await
        .map_err(|e| state.internal("Failed to get projects", e))?;
    Ok(reply(StatusCode::OK, Envelope::success(projects)))
}

pub(super) async fn create(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult {
    let Json(request) = payload?;
    let request = validate_project(&request)?;

    let issue_ids: Vec<IssueId> = request.project_data.iter().map(|a| a.issue_id).collect();
    if let Some(unknown) = state
        .store
        .first_unknown_issue(&issue_ids)
        .await
        .map_err(|e| state.internal("Failed to create project", e))?
    {
        return Err(ApiError::BadRequest(format!("Invalid issue_id: {unknown}")));
    }

    let mut project = match state.store.create_project(user.user_id, &request).await {
        Ok(project) => project,
        Err(err) if err.is_invalid_reference() => {
            tracing::warn!(user_id = user.user_id, error = %err, "Project rejected");
            return Err(ApiError::BadRequest(
                "Invalid reference data provided".to_string(),
            ));
        }
        Err(err) => return Err(state.internal("Failed to create project", err)),
    };

    match state.dispatcher.dispatch(project.project_id).await {
        Ok(Some(_)) => project.status = ProjectStatus::Processing,
        Ok(None) => {}
        Err(err) => {
            tracing::error!(
                project_id = project.project_id,
                error = %err,
                "Could not start evaluation"
            );
        }
    }

    Ok(reply(
        StatusCode::CREATED,
        Envelope::success(project).with_message("Project created successfully"),
    ))
}

pub(super) async fn key_issues(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> ApiResult {
    let issues = state
        .store
        .key_issues()
        .await
        .map_err(|e| state.internal("Failed to get key issues", e))?;
    Ok(reply(StatusCode::OK, Envelope::success(issues)))
}

pub(super) async fn stats(State(state): State<AppState>, user: AuthenticatedUser) -> ApiResult {
    let stats = state
        .store
        .project_stats(user.user_id)
        .await
        .map_err(|e| state.internal("Failed to get project statistics", e))?;
    Ok(reply(StatusCode::OK, Envelope::success(stats)))
}

pub(super) async fn show(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult {
    let project_id = parse_id(&id)?;
    let project = state
        .store
        .get_project(project_id, user.user_id)
        .await
        .map_err(|e| state.internal("Failed to get project", e))?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
    Ok(reply(StatusCode::OK, Envelope::success(project)))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult {
    let project_id = parse_id(&id)?;
    let deleted = state
        .store
        .delete_project(project_id, user.user_id)
        .await
        .map_err(|e| state.internal("Failed to delete project", e))?;
    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }
    Ok(reply(
        StatusCode::OK,
        Envelope::<()>::message("Project deleted successfully"),
    ))
}

pub(super) async fn evaluate(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult {
    let project_id = parse_id(&id)?;
    let project = state
        .store
        .get_project(project_id, user.user_id)
        .await
        .map_err(|e| state.internal("Failed to trigger evaluation", e))?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    let started = state
        .dispatcher
        .dispatch(project_id)
        .await
        .map_err(|e| state.internal("Failed to trigger evaluation", e))?;
    let status = if started.is_some() {
        ProjectStatus::Processing
    } else {
        project.project.status
    };

    Ok(reply(
        StatusCode::ACCEPTED,
        Envelope::success(EvaluationTriggered {
            project_id,
            status,
            evaluator: state.dispatcher.evaluator_name(),
        })
        .with_message("Evaluation triggered"),
    ))
}
