/// Task comment endpoints
///
/// # Endpoints
///
/// - `GET    /v1/tasks/:id/comments` - list a task's comments
/// - `POST   /v1/tasks/:id/comments` - add a comment (members only)
/// - `PATCH  /v1/comments/:id` - edit a comment (author only)
/// - `DELETE /v1/comments/:id` - delete a comment (author only)

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskdeck_shared::auth::authorization::{require_author, require_membership, require_view};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::models::comment::Comment;
use taskdeck_shared::models::project::Project;
use taskdeck_shared::models::task::Task;
use uuid::Uuid;
use validator::Validate;

/// Create/update comment request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    /// Comment body
    #[validate(length(min = 1, max = 10000, message = "content must be 1-10000 characters"))]
    pub content: String,
}

/// Resolves the project of a task, or 404
async fn project_of(state: &AppState, task_id: Uuid) -> ApiResult<Project> {
    let project_id = Task::project_id_of(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Lists comments on a task, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    let project = project_of(&state, id).await?;

    require_view(&state.db, &project, auth.user_id).await?;

    let comments = Comment::list_for_task(&state.db, id).await?;

    Ok(Json(comments))
}

/// Adds a comment to a task
///
/// The author must hold a membership in the task's project at creation
/// time.
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate()?;

    let project = project_of(&state, id).await?;

    require_membership(&state.db, project.id, auth.user_id).await?;

    let comment = Comment::create(&state.db, id, auth.user_id, &req.content).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edits a comment
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<Comment>> {
    req.validate()?;

    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    require_author(&comment, auth.user_id)?;

    let updated = Comment::update_content(&state.db, id, &req.content)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    Ok(Json(updated))
}

/// Deletes a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    require_author(&comment, auth.user_id)?;

    Comment::delete(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
