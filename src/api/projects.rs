//! Portfolio project API endpoints.

use axum::extract::{Path, State};
use chrono::Utc;

use super::{ApiResponse, ApiResult};
use crate::errors::{AppError, AppJson};
use crate::models::{CreateProjectRequest, Project, PublishProjectRequest};
use crate::AppState;

/// GET /api/projects - List all projects.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    Ok(ApiResponse::new(state.projects.list().await))
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateProjectRequest>,
) -> ApiResult<Project> {
    let project = request
        .into_project(Utc::now())
        .ok_or_else(|| AppError::Validation("All fields are required".to_string()))?;

    let project = state.projects.create(project).await;
    tracing::info!(id = %project.id, "Project created");

    Ok(ApiResponse::created(project))
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state
        .projects
        .delete(&id)
        .await
        .ok_or_else(project_not_found)?;

    Ok(ApiResponse::message("Project deleted successfully"))
}

/// PATCH /api/projects/:id - Toggle the published flag.
pub async fn publish_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<PublishProjectRequest>,
) -> ApiResult<Project> {
    let published = request
        .published
        .ok_or_else(|| AppError::Validation("published must be a boolean".to_string()))?;

    let project = state
        .projects
        .update(&id, |project| project.published = published)
        .await
        .ok_or_else(project_not_found)?;

    Ok(ApiResponse::new(project))
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".to_string())
}
