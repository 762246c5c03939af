/// Row-level authorization checks
///
/// The original system leaned on declarative per-row store policies; here
/// every guarantee is an explicit function that read and write paths call
/// before touching rows, so the rules hold regardless of what the storage
/// layer enforces natively.
///
/// # Access model
///
/// 1. **Visibility**: a project is visible to its owner and its members
/// 2. **Role**: member management needs Admin+, project deletion Owner
/// 3. **Assignability**: only project members can be assigned to tasks
/// 4. **Authorship**: comments are edited/deleted only by their author
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::auth::authorization::{require_view, require_role};
/// use taskdeck_shared::models::membership::ProjectRole;
/// use taskdeck_shared::models::project::Project;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project: Project, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// require_view(&pool, &project, user_id).await?;
/// require_role(&pool, project.id, user_id, ProjectRole::Admin).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::columns;
use crate::models::comment::Comment;
use crate::models::membership::{Membership, ProjectRole};
use crate::models::project::Project;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User is not a member of the project
    #[error("Not a member of project {0}")]
    NotMember(Uuid),

    /// User doesn't have the required role
    #[error("Insufficient permissions: requires {required:?}, has {actual:?}")]
    InsufficientRole {
        required: ProjectRole,
        actual: ProjectRole,
    },

    /// User is not the author of the resource
    #[error("Not the author of this resource")]
    NotAuthor,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that a user may view a project
///
/// Visible iff the user owns the project or holds a membership row. The
/// owner path works even with zero membership rows, so a project is never
/// invisible to its own owner.
///
/// # Errors
///
/// Returns [`AuthzError::NotMember`] when neither holds.
pub async fn require_view(
    pool: &PgPool,
    project: &Project,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let memberships = match Membership::find(pool, project.id, user_id).await? {
        Some(m) => vec![m],
        None => vec![],
    };

    if !columns::can_view(user_id, project, &memberships) {
        return Err(AuthzError::NotMember(project.id));
    }

    Ok(())
}

/// Checks that a user is a member of a project
///
/// # Errors
///
/// Returns [`AuthzError::NotMember`] if no membership row exists.
pub async fn require_membership(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    let has_access = Membership::has_access(pool, project_id, user_id).await?;

    if !has_access {
        return Err(AuthzError::NotMember(project_id));
    }

    Ok(())
}

/// Checks that a user holds at least the required role in a project
///
/// # Errors
///
/// Returns [`AuthzError::NotMember`] if the user is not a member at all,
/// [`AuthzError::InsufficientRole`] if the role is too low.
pub async fn require_role(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
    required_role: ProjectRole,
) -> Result<(), AuthzError> {
    let user_role = Membership::get_role(pool, project_id, user_id)
        .await?
        .ok_or(AuthzError::NotMember(project_id))?;

    if !user_role.has_permission(&required_role) {
        return Err(AuthzError::InsufficientRole {
            required: required_role,
            actual: user_role,
        });
    }

    Ok(())
}

/// Checks that an identity may be assigned to tasks in a project
///
/// An assignment must not reference an identity without a membership row in
/// the task's project; this is the application-level half of that
/// invariant (the unique pair constraint is the other).
///
/// # Errors
///
/// Returns [`AuthzError::NotMember`] if the assignee holds no membership.
pub async fn require_assignable(
    pool: &PgPool,
    project_id: Uuid,
    assignee_id: Uuid,
) -> Result<(), AuthzError> {
    let membership = match Membership::find(pool, project_id, assignee_id).await? {
        Some(m) => vec![m],
        None => vec![],
    };

    if !columns::can_assign(assignee_id, project_id, &membership) {
        return Err(AuthzError::NotMember(project_id));
    }

    Ok(())
}

/// Checks that the user authored a comment
///
/// # Errors
///
/// Returns [`AuthzError::NotAuthor`] for anyone but the author.
pub fn require_author(comment: &Comment, user_id: Uuid) -> Result<(), AuthzError> {
    if comment.author_id != user_id {
        return Err(AuthzError::NotAuthor);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_require_author() {
        let author = Uuid::new_v4();
        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            author_id: author,
            content: "looks good".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(require_author(&comment, author).is_ok());
        assert!(matches!(
            require_author(&comment, Uuid::new_v4()),
            Err(AuthzError::NotAuthor)
        ));
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::NotMember(Uuid::new_v4());
        assert!(err.to_string().contains("Not a member"));

        let err = AuthzError::InsufficientRole {
            required: ProjectRole::Admin,
            actual: ProjectRole::Member,
        };
        assert!(err.to_string().contains("Insufficient permissions"));

        let err = AuthzError::NotAuthor;
        assert!(err.to_string().contains("Not the author"));
    }
}
