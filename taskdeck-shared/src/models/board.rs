/// Board model and database operations
///
/// Every project gets one default board at creation time; additional boards
/// are ordered by their `position` within the project.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     position INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board ID
    pub id: Uuid,

    /// Project this board belongs to
    pub project_id: Uuid,

    /// Board name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Ordinal position within the project
    pub position: i32,

    /// When the board was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    /// Project ID
    pub project_id: Uuid,

    /// Board name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Ordinal position within the project
    #[serde(default)]
    pub position: i32,
}

impl Board {
    /// Creates a board
    ///
    /// Generic over the executor so it can run standalone or as a step of
    /// the project creation transaction.
    pub async fn create<'e, E>(executor: E, data: CreateBoard) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (project_id, name, description, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, project_id, name, description, position, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.position)
        .fetch_one(executor)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, project_id, name, description, position, created_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Finds the default (first) board of a project
    pub async fn find_default_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, project_id, name, description, position, created_at
            FROM boards
            WHERE project_id = $1
            ORDER BY position ASC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists all boards of a project in position order
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, project_id, name, description, position, created_at
            FROM boards
            WHERE project_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }
}
