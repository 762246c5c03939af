/// Project endpoints: the dashboard's list and the project lifecycle
///
/// # Endpoints
///
/// - `GET    /v1/projects` - projects visible to the caller, paginated
/// - `POST   /v1/projects` - create a project (with owner membership and
///   default board, atomically)
/// - `GET    /v1/projects/:id` - fetch one project
/// - `DELETE /v1/projects/:id` - delete a project and everything beneath it

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::auth::authorization::{require_role, require_view};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::models::membership::ProjectRole;
use taskdeck_shared::models::project::{CreateProject, Project};
use uuid::Uuid;
use validator::Validate;

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Pagination {
    /// Page size (default 20, max 100)
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,

    /// Offset into the result set
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

/// Project list response
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    /// Visible projects, newest first
    pub projects: Vec<Project>,

    /// Total number of visible projects
    pub total: i64,

    /// Echoed page size
    pub limit: i64,

    /// Echoed offset
    pub offset: i64,
}

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Lists projects visible to the caller
///
/// A project is visible iff the caller owns it or holds a membership in it.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<ProjectListResponse>> {
    page.validate()?;

    let projects =
        Project::list_visible_to(&state.db, auth.user_id, page.limit, page.offset).await?;
    let total = Project::count_visible_to(&state.db, auth.user_id).await?;

    Ok(Json(ProjectListResponse {
        projects,
        total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Creates a project
///
/// Runs the creation workflow: project row, owner membership, and default
/// board in a single transaction. A failure at any step leaves nothing
/// behind.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate()?;

    let project = Project::create_with_owner(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
        },
        auth.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Fetches a single project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_view(&state.db, &project, auth.user_id).await?;

    Ok(Json(project))
}

/// Deletes a project
///
/// Owner only. Cascades to boards, tasks, assignments, comments, and
/// memberships.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_view(&state.db, &project, auth.user_id).await?;
    require_role(&state.db, project.id, auth.user_id, ProjectRole::Owner).await?;

    Project::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
