use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use super::project_dto::{AddMemberRequest, CreateProjectRequest};
use super::project_models::Project;
use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Create a project; the creator becomes its first member
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 409, description = "Project name already taken"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let project = state.project_service.create_project(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects the authenticated user belongs to
#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_projects(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<Project>>> {
    let projects = state.project_service.list_projects(user_id).await?;
    Ok(Json(projects))
}

/// Get a single project (members only)
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = Uuid, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Project>> {
    let project = state.project_service.get_project(user_id, project_id).await?;
    Ok(Json(project))
}

/// Add a member to a project (members only)
#[utoipa::path(
    post,
    path = "/api/projects/{id}/members",
    params(("id" = Uuid, Path, description = "Project ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 204, description = "Member added"),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Project not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "projects",
    security(("bearer_auth" = []))
)]
pub async fn add_member(
    State(state): State<AppState>,
    Extension(user_id): Extension<Uuid>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> Result<StatusCode> {
    state
        .project_service
        .add_member(user_id, project_id, payload.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
