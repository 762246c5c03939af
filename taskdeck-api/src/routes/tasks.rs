/// Task endpoints: detail view, field edits, drag-drop moves, deletion
///
/// # Endpoints
///
/// - `GET    /v1/tasks/:id` - task detail with assignees and comments
/// - `PATCH  /v1/tasks/:id` - partial field update (last-write-wins)
/// - `POST   /v1/tasks/:id/move` - drag-drop move
/// - `DELETE /v1/tasks/:id` - delete
///
/// # Move semantics
///
/// The move endpoint assigns the dropped column and index verbatim. A drop
/// on the task's current spot is a no-op and is not written, so rapid
/// repeated drops never reach the store.

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskdeck_shared::auth::authorization::{require_membership, require_view};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::columns;
use taskdeck_shared::models::assignment::Assignment;
use taskdeck_shared::models::comment::Comment;
use taskdeck_shared::models::project::Project;
use taskdeck_shared::models::task::{Task, TaskStatus, UpdateTaskFields};
use uuid::Uuid;
use validator::Validate;

/// Task detail response: the task modal's read model
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    /// The task
    #[serde(flatten)]
    pub task: Task,

    /// Assigned identities
    pub assignees: Vec<Assignment>,

    /// Comments, oldest first
    pub comments: Vec<Comment>,
}

/// Partial task update request
///
/// A field that is absent stays untouched; an explicit `null` clears a
/// nullable field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description; null clears it
    #[serde(default, deserialize_with = "some_value")]
    pub description: Option<Option<String>>,

    /// New status column
    pub status: Option<TaskStatus>,

    /// New due date; null clears it
    #[serde(default, deserialize_with = "some_value")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Distinguishes an absent field (outer None, via default) from an explicit
/// null (Some(None)).
fn some_value<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Move task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MoveTaskRequest {
    /// Destination column
    pub status: TaskStatus,

    /// Destination index within the column
    #[validate(range(min = 0))]
    pub index: i32,
}

/// Resolves a task and the project it belongs to, or 404
async fn load_task_and_project(
    state: &AppState,
    task_id: Uuid,
) -> ApiResult<(Task, Project)> {
    let task = Task::find_by_id(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project_id = Task::project_id_of(&state.db, task.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok((task, project))
}

/// Fetches a task with its assignees and comments
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let (task, project) = load_task_and_project(&state, id).await?;

    require_view(&state.db, &project, auth.user_id).await?;

    let assignees = Assignment::list_for_task(&state.db, task.id).await?;
    let comments = Comment::list_for_task(&state.db, task.id).await?;

    Ok(Json(TaskDetailResponse {
        task,
        assignees,
        comments,
    }))
}

/// Applies a partial field update to a task
///
/// Title, description, status, and due date are each written only when
/// present in the request; concurrent edits apply last-write-wins at the
/// granularity of each request's field set.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    if let Some(title) = &req.title {
        if title.is_empty() || title.len() > 255 {
            return Err(ApiError::BadRequest(
                "title must be 1-255 characters".to_string(),
            ));
        }
    }

    let (task, project) = load_task_and_project(&state, id).await?;

    require_membership(&state.db, project.id, auth.user_id).await?;

    let fields = UpdateTaskFields {
        title: req.title,
        description: req.description,
        status: req.status,
        due_date: req.due_date,
    };

    // Nothing to write; hand back the current row unchanged.
    if fields.is_empty() {
        return Ok(Json(task));
    }

    let updated = Task::update_fields(&state.db, id, fields)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(updated))
}

/// Moves a task to a column and index
///
/// Computes the mutation from the task's current spot; an identical
/// destination skips the write entirely.
pub async fn move_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let (task, project) = load_task_and_project(&state, id).await?;

    require_membership(&state.db, project.id, auth.user_id).await?;

    match columns::compute_move(task.status, task.position, req.status, req.index) {
        None => Ok(Json(task)),
        Some(mv) => {
            let moved = Task::apply_move(&state.db, id, mv)
                .await?
                .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

            Ok(Json(moved))
        }
    }
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (task, project) = load_task_and_project(&state, id).await?;

    require_membership(&state.db, project.id, auth.user_id).await?;

    Task::delete(&state.db, task.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("New"));
        assert!(req.description.is_none());

        let req: UpdateTaskRequest = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(req.description, Some(None));

        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"description": "details"}"#).unwrap();
        assert_eq!(req.description, Some(Some("details".to_string())));
    }

    #[test]
    fn test_move_request_parses_status() {
        let req: MoveTaskRequest =
            serde_json::from_str(r#"{"status": "in_progress", "index": 3}"#).unwrap();
        assert_eq!(req.status, TaskStatus::InProgress);
        assert_eq!(req.index, 3);
    }
}
