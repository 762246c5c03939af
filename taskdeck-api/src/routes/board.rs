/// Board endpoints: the kanban read model and task creation
///
/// # Endpoints
///
/// - `GET  /v1/projects/:id/board` - the project's default board with its
///   tasks partitioned into ordered status columns
/// - `POST /v1/boards/:id/tasks` - create a task, appended at the end of
///   its target column
///
/// # Example board response
///
/// ```json
/// {
///   "board": { "id": "...", "name": "Main Board", ... },
///   "columns": [
///     { "status": "todo", "tasks": [ ... ] },
///     { "status": "in_progress", "tasks": [] },
///     { "status": "review", "tasks": [] },
///     { "status": "done", "tasks": [] }
///   ]
/// }
/// ```

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskdeck_shared::auth::authorization::{require_membership, require_view};
use taskdeck_shared::auth::middleware::AuthContext;
use taskdeck_shared::columns;
use taskdeck_shared::models::board::Board;
use taskdeck_shared::models::project::Project;
use taskdeck_shared::models::task::{CreateTask, Task, TaskStatus, TaskWithMeta};
use uuid::Uuid;
use validator::Validate;

/// One rendered board lane
#[derive(Debug, Serialize)]
pub struct ColumnResponse {
    /// Status of this lane
    pub status: TaskStatus,

    /// Tasks in position order, with assignees and comment counts
    pub tasks: Vec<TaskWithMeta>,
}

/// Board view response
#[derive(Debug, Serialize)]
pub struct BoardViewResponse {
    /// The board itself
    pub board: Board,

    /// All four lanes in column order, empty ones included
    pub columns: Vec<ColumnResponse>,
}

/// Create task request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Target column (defaults to todo)
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

/// Returns the project's default board partitioned into status columns
///
/// The partition is a total, non-overlapping cover of the board's tasks:
/// every task appears in exactly one lane, each lane ascending by position.
pub async fn get_board_view(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BoardViewResponse>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    require_view(&state.db, &project, auth.user_id).await?;

    let board = Board::find_default_for_project(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    let tasks = Task::list_for_board_with_meta(&state.db, board.id).await?;

    let columns = columns::partition(tasks, &TaskStatus::ALL)
        .into_iter()
        .map(|(status, tasks)| ColumnResponse { status, tasks })
        .collect();

    Ok(Json(BoardViewResponse { board, columns }))
}

/// Creates a task on a board
///
/// The new task is appended at the end of its target column: its position
/// is one greater than the column's maximum, or 0 for an empty column.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let board = Board::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_membership(&state.db, board.project_id, auth.user_id).await?;

    let task = Task::create_at_end(
        &state.db,
        CreateTask {
            board_id: board.id,
            title: req.title,
            description: req.description,
            status: req.status,
            due_date: req.due_date,
            created_by: Some(auth.user_id),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}
