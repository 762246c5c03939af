/// Task assignee endpoints
///
/// # Endpoints
///
/// - `PUT    /v1/tasks/:id/assignees/:user_id` - assign an identity
/// - `DELETE /v1/tasks/:id/assignees/:user_id` - unassign an identity
///
/// An assignment may only reference an identity that holds a membership in
/// the task's project; the check runs before the insert, and the unique
/// (task, user) pair turns a repeated assign into a 409 rather than a
/// silent duplicate.

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use taskdeck_shared::auth::authorization::{require_assignable, require_membership};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::models::assignment::Assignment;
use taskdeck_shared::models::task::Task;
use uuid::Uuid;

/// Resolves the project of a task, or 404
async fn project_of(state: &AppState, task_id: Uuid) -> ApiResult<Uuid> {
    Task::project_id_of(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Assigns an identity to a task
pub async fn assign_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((task_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<(StatusCode, Json<Assignment>)> {
    let project_id = project_of(&state, task_id).await?;

    require_membership(&state.db, project_id, auth.user_id).await?;
    require_assignable(&state.db, project_id, user_id).await?;

    let assignment = Assignment::create(&state.db, task_id, user_id).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Removes an identity from a task
pub async fn unassign_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((task_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let project_id = project_of(&state, task_id).await?;

    require_membership(&state.db, project_id, auth.user_id).await?;

    let removed = Assignment::delete(&state.db, task_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
