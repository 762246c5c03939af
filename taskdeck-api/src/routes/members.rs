/// Project membership endpoints
///
/// # Endpoints
///
/// - `GET  /v1/projects/:id/members` - list memberships
/// - `POST /v1/projects/:id/members` - add a member (Admin+)
///
/// Adding a member requires Admin or Owner role. The unique
/// (project, user) pair makes a duplicate add surface as a conflict rather
/// than a silent second row.

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::{require_role, require_view};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::models::membership::{CreateMembership, Membership, ProjectRole};
use taskdeck_shared::models::project::Project;
use uuid::Uuid;

/// Add member request
#[derive(Debug, Clone, Deserialize)]
pub struct AddMemberRequest {
    /// Identity to add
    pub user_id: Uuid,

    /// Role to grant (defaults to Member)
    #[serde(default = "default_role")]
    pub role: ProjectRole,
}

fn default_role() -> ProjectRole {
    ProjectRole::Member
}

/// Lists memberships of a project
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Membership>>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_view(&state.db, &project, auth.user_id).await?;

    let members = Membership::list_for_project(&state.db, id).await?;

    Ok(Json(members))
}

/// Adds a member to a project
///
/// The owner role is granted only by project creation; requests asking for
/// it are rejected.
pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_view(&state.db, &project, auth.user_id).await?;
    require_role(&state.db, project.id, auth.user_id, ProjectRole::Admin).await?;

    if req.role == ProjectRole::Owner {
        return Err(ApiError::BadRequest(
            "The owner role cannot be granted".to_string(),
        ));
    }

    let membership = Membership::create(
        &state.db,
        CreateMembership {
            project_id: id,
            user_id: req.user_id,
            role: req.role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}
