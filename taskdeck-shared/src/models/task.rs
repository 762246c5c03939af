/// Task model and database operations
///
/// Tasks live on a board in one of four fixed status columns and are ordered
/// within their column by an integer `position`. New tasks always append at
/// the end of their column; moves assign the dropped index verbatim (see
/// [`crate::columns`] for the ordering rules).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'review', 'done');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     position INTEGER NOT NULL,
///     due_date TIMESTAMPTZ,
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{CreateTask, Task, TaskStatus};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create_at_end(&pool, CreateTask {
///     board_id: Uuid::new_v4(),
///     title: "Write release notes".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     due_date: None,
///     created_by: Some(Uuid::new_v4()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::columns;

/// Task lifecycle state, rendered as a board lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Awaiting review
    Review,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses in board column order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Board this task belongs to
    pub board_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Current status column
    pub status: TaskStatus,

    /// Ordering key within the (board, status) column
    pub position: i32,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Identity that created the task (nullable if user deleted)
    pub created_by: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task row enriched with assignee ids and comment count
///
/// This is the board read model: one query returns everything the board
/// needs to render a card.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithMeta {
    /// The task itself
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,

    /// Identities assigned to the task
    pub assignee_ids: Vec<Uuid>,

    /// Number of comments on the task
    pub comment_count: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Board ID
    pub board_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Target status column (defaults to Todo)
    #[serde(default = "default_status")]
    pub status: TaskStatus,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Identity creating the task
    pub created_by: Option<Uuid>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Todo
}

/// Input for a partial field update
///
/// Only non-None fields are written; the update is last-write-wins at the
/// granularity of the provided field set. `Some(None)` clears a nullable
/// field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskFields {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status column
    pub status: Option<TaskStatus>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskFields {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

impl Task {
    /// Creates a task appended at the end of its target column
    ///
    /// Reads the current column contents and assigns `position` one greater
    /// than the maximum, or 0 for an empty column, so new tasks never
    /// collide with an existing position.
    ///
    /// # Errors
    ///
    /// Returns an error if database operations fail
    pub async fn create_at_end(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let siblings = Self::list_for_column(pool, data.board_id, data.status).await?;
        let position = columns::insert_position(&siblings);

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (board_id, title, description, status, position, due_date, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, board_id, title, description, status, position,
                      due_date, created_by, created_at, updated_at
            "#,
        )
        .bind(data.board_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(position)
        .bind(data.due_date)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, board_id, title, description, status, position,
                   due_date, created_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks on a board, ordered by column position
    pub async fn list_for_board(pool: &PgPool, board_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, board_id, title, description, status, position,
                   due_date, created_by, created_at, updated_at
            FROM tasks
            WHERE board_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in one (board, status) column, ordered by position
    pub async fn list_for_column(
        pool: &PgPool,
        board_id: Uuid,
        status: TaskStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, board_id, title, description, status, position,
                   due_date, created_by, created_at, updated_at
            FROM tasks
            WHERE board_id = $1 AND status = $2
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(board_id)
        .bind(status)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists board tasks with nested assignee ids and comment counts
    pub async fn list_for_board_with_meta(
        pool: &PgPool,
        board_id: Uuid,
    ) -> Result<Vec<TaskWithMeta>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithMeta>(
            r#"
            SELECT t.id, t.board_id, t.title, t.description, t.status, t.position,
                   t.due_date, t.created_by, t.created_at, t.updated_at,
                   COALESCE(
                       ARRAY_AGG(DISTINCT a.user_id) FILTER (WHERE a.user_id IS NOT NULL),
                       '{}'
                   ) AS assignee_ids,
                   COUNT(DISTINCT c.id) AS comment_count
            FROM tasks t
            LEFT JOIN assignments a ON a.task_id = t.id
            LEFT JOIN comments c ON c.task_id = t.id
            WHERE t.board_id = $1
            GROUP BY t.id
            ORDER BY t.position ASC, t.created_at ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial field update
    ///
    /// Builds the SET list from the fields present in `data`. Returns the
    /// updated task, or None if the task doesn't exist. Calling with an
    /// empty update only touches `updated_at`.
    pub async fn update_fields(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTaskFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, board_id, title, description, status, position, \
             due_date, created_by, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Applies a computed move, writing the new status and position
    ///
    /// Callers are expected to run [`columns::compute_move`] first and skip
    /// the write entirely when it returns None.
    pub async fn apply_move(
        pool: &PgPool,
        id: Uuid,
        mv: columns::TaskMove,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2,
                position = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, board_id, title, description, status, position,
                      due_date, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(mv.status)
        .bind(mv.position)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Assignments and comments go with it via CASCADE.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves the project a task belongs to (via its board)
    pub async fn project_id_of(pool: &PgPool, task_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let project_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT b.project_id
            FROM tasks t
            JOIN boards b ON b.id = t.board_id
            WHERE t.id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

        Ok(project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Review.as_str(), "review");
        assert_eq!(TaskStatus::Done.as_str(), "done");
    }

    #[test]
    fn test_status_column_order() {
        assert_eq!(TaskStatus::ALL.len(), 4);
        assert_eq!(TaskStatus::ALL[0], TaskStatus::Todo);
        assert_eq!(TaskStatus::ALL[3], TaskStatus::Done);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: TaskStatus = serde_json::from_str("\"review\"").unwrap();
        assert_eq!(status, TaskStatus::Review);
    }

    #[test]
    fn test_update_fields_is_empty() {
        assert!(UpdateTaskFields::default().is_empty());

        let update = UpdateTaskFields {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());

        // Clearing a field still counts as a write
        let update = UpdateTaskFields {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_default_status() {
        assert_eq!(default_status(), TaskStatus::Todo);
    }
}
