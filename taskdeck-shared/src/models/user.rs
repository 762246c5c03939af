/// User model and database operations
///
/// Users are issued and authenticated by an external identity provider; this
/// table is a local mirror so memberships, assignments, and comments have a
/// row to reference. Rows are upserted from validated token claims on each
/// authenticated request. There is no password column: credential handling
/// never enters this system.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     display_name TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Mirrored identity row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Identity provider's subject ID
    pub id: Uuid,

    /// Email address from token claims
    pub email: String,

    /// Optional display name from token claims
    pub display_name: Option<String>,

    /// When the mirror row was first created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Upserts a user from token claims
    ///
    /// Inserts the identity on first sight; on subsequent requests refreshes
    /// email and display name so the mirror tracks the identity provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(
        pool: &PgPool,
        id: Uuid,
        email: &str,
        display_name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, display_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                display_name = EXCLUDED.display_name
            RETURNING id, email, display_name, created_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(display_name)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, display_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
