/// Membership model and database operations
///
/// A membership grants an identity visibility and write access to a project.
/// It is a many-to-many relationship between users and projects with a role
/// attached. The project owner's membership is created together with the
/// project itself, so the visibility rule (owner or member) never strands an
/// owner outside their own project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE memberships (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role project_role NOT NULL DEFAULT 'member',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: delete the project, everything below
/// - **admin**: manage members, everything below
/// - **member**: create and edit boards, tasks, and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role of a user within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Full control, including project deletion
    Owner,

    /// Can manage members
    Admin,

    /// Can create and edit tasks and comments
    Member,
}

impl ProjectRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Admin => "admin",
            ProjectRole::Member => "member",
        }
    }

    /// Can add or remove project members
    pub fn can_manage_members(&self) -> bool {
        matches!(self, ProjectRole::Owner | ProjectRole::Admin)
    }

    /// Can delete the project
    pub fn can_delete_project(&self) -> bool {
        matches!(self, ProjectRole::Owner)
    }

    /// Checks if this role meets a required role
    ///
    /// Hierarchy: Owner > Admin > Member
    pub fn has_permission(&self, required: &ProjectRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    fn permission_level(&self) -> u8 {
        match self {
            ProjectRole::Owner => 3,
            ProjectRole::Admin => 2,
            ProjectRole::Member => 1,
        }
    }
}

/// Membership row linking a user to a project with a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: ProjectRole,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new membership
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role to assign (defaults to Member)
    #[serde(default = "default_role")]
    pub role: ProjectRole,
}

fn default_role() -> ProjectRole {
    ProjectRole::Member
}

impl Membership {
    /// Creates a new membership (adds a user to a project)
    ///
    /// Generic over the executor so it can run standalone or as a step of
    /// the project creation transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The membership already exists (unique constraint violation)
    /// - Project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create<'e, E>(executor: E, data: CreateMembership) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (project_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING project_id, user_id, role, created_at
            "#,
        )
        .bind(data.project_id)
        .bind(data.user_id)
        .bind(data.role)
        .fetch_one(executor)
        .await?;

        Ok(membership)
    }

    /// Finds a specific membership by project and user
    pub async fn find(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, role, created_at
            FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(membership)
    }

    /// Checks if a user holds a membership in a project (any role)
    pub async fn has_access(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM memberships
                WHERE project_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Gets a user's role in a project
    ///
    /// Returns None if the user is not a member.
    pub async fn get_role(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        let role: Option<ProjectRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM memberships
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Lists all memberships for a project
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, role, created_at
            FROM memberships
            WHERE project_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(memberships)
    }

    /// Removes a user from a project
    pub async fn delete(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM memberships WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(ProjectRole::Owner.as_str(), "owner");
        assert_eq!(ProjectRole::Admin.as_str(), "admin");
        assert_eq!(ProjectRole::Member.as_str(), "member");
    }

    #[test]
    fn test_role_permissions() {
        assert!(ProjectRole::Owner.can_manage_members());
        assert!(ProjectRole::Admin.can_manage_members());
        assert!(!ProjectRole::Member.can_manage_members());

        assert!(ProjectRole::Owner.can_delete_project());
        assert!(!ProjectRole::Admin.can_delete_project());
        assert!(!ProjectRole::Member.can_delete_project());
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(ProjectRole::Owner.has_permission(&ProjectRole::Admin));
        assert!(ProjectRole::Owner.has_permission(&ProjectRole::Member));
        assert!(ProjectRole::Admin.has_permission(&ProjectRole::Member));
        assert!(!ProjectRole::Admin.has_permission(&ProjectRole::Owner));
        assert!(!ProjectRole::Member.has_permission(&ProjectRole::Admin));
        assert!(ProjectRole::Member.has_permission(&ProjectRole::Member));
    }

    #[test]
    fn test_default_role() {
        assert_eq!(default_role(), ProjectRole::Member);
    }
}
