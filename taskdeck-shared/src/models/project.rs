/// Project model and database operations
///
/// A project is the top-level container: it is owned by exactly one identity
/// and carries memberships, a default board, and everything beneath.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id UUID NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Creation workflow
///
/// [`Project::create_with_owner`] inserts the project row, the owner's
/// membership, and the default board in a single transaction. Either all
/// three exist afterwards or none do; a failure at any step rolls the whole
/// workflow back, so a project can never exist without the owner membership
/// that makes it visible to its own owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::board::{Board, CreateBoard};
use super::membership::{CreateMembership, Membership, ProjectRole};

/// Name given to the board created alongside every project
pub const DEFAULT_BOARD_NAME: &str = "Main Board";

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Identity that owns the project
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

impl Project {
    /// Creates a project together with its owner membership and default board
    ///
    /// The three inserts run in one transaction:
    ///
    /// 1. project row, `owner_id` = caller
    /// 2. membership row `(project, caller, owner)`
    /// 3. default board at position 0
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; the transaction is rolled back
    /// and no partial state remains.
    pub async fn create_with_owner(
        pool: &PgPool,
        data: CreateProject,
        owner_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;

        Membership::create(
            &mut *tx,
            CreateMembership {
                project_id: project.id,
                user_id: owner_id,
                role: ProjectRole::Owner,
            },
        )
        .await?;

        Board::create(
            &mut *tx,
            CreateBoard {
                project_id: project.id,
                name: DEFAULT_BOARD_NAME.to_string(),
                description: None,
                position: 0,
            },
        )
        .await?;

        tx.commit().await?;

        info!(project_id = %project.id, owner_id = %owner_id, "Project created");
        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects visible to a user, newest first, with pagination
    ///
    /// A project is visible iff the user owns it or holds a membership in
    /// it. Owner memberships are created with the project, so the membership
    /// check alone would suffice in a healthy database; the owner check is
    /// kept so visibility never depends on the join row.
    pub async fn list_visible_to(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT DISTINCT p.id, p.name, p.description, p.owner_id, p.created_at
            FROM projects p
            LEFT JOIN memberships m ON m.project_id = p.id
            WHERE p.owner_id = $1 OR m.user_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Counts projects visible to a user
    pub async fn count_visible_to(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT p.id)
            FROM projects p
            LEFT JOIN memberships m ON m.project_id = p.id
            WHERE p.owner_id = $1 OR m.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Deletes a project
    ///
    /// Cascades to boards, tasks, assignments, comments, and memberships.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(project_id = %id, "Project deleted");
        }

        Ok(result.rows_affected() > 0)
    }

    /// Gets the project's default board
    pub async fn default_board(pool: &PgPool, project_id: Uuid) -> Result<Option<Board>, sqlx::Error> {
        Board::find_default_for_project(pool, project_id).await
    }
}
