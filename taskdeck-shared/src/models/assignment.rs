/// Assignment model and database operations
///
/// Assignments are a many-to-many relationship between tasks and identities.
/// The composite primary key makes the pair unique: assigning an already
/// assigned identity surfaces a unique-constraint conflict instead of
/// silently inserting a duplicate.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE assignments (
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (task_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Assignment row linking an identity to a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Assignment {
    /// Task ID
    pub task_id: Uuid,

    /// Assigned identity
    pub user_id: Uuid,

    /// When the assignment was created
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Assigns an identity to a task
    ///
    /// # Errors
    ///
    /// Returns an error if the pair already exists (unique constraint
    /// violation) or the task/user is missing (foreign key violation).
    pub async fn create(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<Self, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (task_id, user_id)
            VALUES ($1, $2)
            RETURNING task_id, user_id, created_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(assignment)
    }

    /// Removes an identity from a task
    pub async fn delete(pool: &PgPool, task_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM assignments WHERE task_id = $1 AND user_id = $2",
        )
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists assignments for a task
    pub async fn list_for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT task_id, user_id, created_at
            FROM assignments
            WHERE task_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(assignments)
    }
}
