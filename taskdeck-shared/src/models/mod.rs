/// Database models for taskdeck
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Local mirror of externally-issued identities
/// - `project`: Top-level container owned by one identity
/// - `membership`: User-project relationships with roles
/// - `board`: Kanban board, one default per project
/// - `task`: Board task with status column and ordering position
/// - `assignment`: Many-to-many task assignees
/// - `comment`: Task comments, editable only by their author
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::project::{CreateProject, Project};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create_with_owner(&pool, CreateProject {
///     name: "Acme".to_string(),
///     description: None,
/// }, Uuid::new_v4()).await?;
/// # Ok(())
/// # }
/// ```

pub mod assignment;
pub mod board;
pub mod comment;
pub mod membership;
pub mod project;
pub mod task;
pub mod user;
