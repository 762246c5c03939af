/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `projects`: Dashboard listing and project lifecycle
/// - `members`: Project membership management
/// - `board`: Board view and task creation
/// - `tasks`: Task detail, field edits, moves, deletion
/// - `assignments`: Task assignee management
/// - `comments`: Task comments

pub mod assignments;
pub mod board;
pub mod comments;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
