/// Board column logic: partitioning, positions, and moves
///
/// Pure functions over task data, independent of the database and the HTTP
/// layer. The store stays the sole source of truth: nothing here caches
/// state across calls, callers pass in the rows they just read.
///
/// # Ordering rules
///
/// - A task's `position` orders it within its (board, status) column.
/// - New tasks append at the end of their column: max position + 1, or 0
///   for an empty column.
/// - A move assigns the dropped index verbatim and does NOT renumber the
///   other tasks in the column. Two rapid or concurrent moves can therefore
///   leave siblings sharing a position; [`partition`] breaks such ties by
///   creation time so rendering stays deterministic.
/// - A move whose destination equals the task's current status and position
///   is a no-op and must not be written.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::membership::Membership;
use crate::models::project::Project;
use crate::models::task::{Task, TaskStatus, TaskWithMeta};

/// Anything that can sit in a board column
///
/// Implemented for [`Task`] and for the enriched board read model, so the
/// same partitioning serves both.
pub trait ColumnEntry {
    /// Status column the entry belongs to
    fn status(&self) -> TaskStatus;

    /// Ordering position within the column
    fn position(&self) -> i32;

    /// Creation time, used as the tiebreak for duplicate positions
    fn created_at(&self) -> DateTime<Utc>;
}

impl ColumnEntry for Task {
    fn status(&self) -> TaskStatus {
        self.status
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl ColumnEntry for TaskWithMeta {
    fn status(&self) -> TaskStatus {
        self.task.status
    }

    fn position(&self) -> i32 {
        self.task.position
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.task.created_at
    }
}

/// Computed mutation for a task move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMove {
    /// Destination status column
    pub status: TaskStatus,

    /// Destination position, assigned verbatim from the drop index
    pub position: i32,
}

/// Partitions tasks into per-status columns, each ordered ascending by position
///
/// The result is a total, non-overlapping cover of the input: every task
/// appears in exactly one column. Columns come back in the order of
/// `statuses`, empty ones included, so the board renders every lane.
///
/// A task whose status is not listed in `statuses` is a caller programming
/// error; it is dropped from the output and flagged in debug builds.
pub fn partition<T: ColumnEntry>(
    tasks: Vec<T>,
    statuses: &[TaskStatus],
) -> Vec<(TaskStatus, Vec<T>)> {
    let mut columns: Vec<(TaskStatus, Vec<T>)> =
        statuses.iter().map(|s| (*s, Vec::new())).collect();

    for task in tasks {
        match columns.iter_mut().find(|(s, _)| *s == task.status()) {
            Some((_, column)) => column.push(task),
            None => {
                debug_assert!(false, "task status {:?} not in partition statuses", task.status());
            }
        }
    }

    for (_, column) in columns.iter_mut() {
        column.sort_by_key(|t| (t.position(), t.created_at()));
    }

    columns
}

/// Computes the position for a task appended to a column
///
/// One greater than the maximum existing position, or 0 for an empty
/// column. Never collides with an existing position as long as the
/// unique-position invariant held before the insert.
pub fn insert_position<T: ColumnEntry>(existing: &[T]) -> i32 {
    existing
        .iter()
        .map(|t| t.position())
        .max()
        .map_or(0, |max| max + 1)
}

/// Computes the mutation for a drag-drop move, or None for a no-op
///
/// Returns None when the destination column and index equal the task's
/// current ones; the caller must then skip the write, so repeated drops on
/// the same spot never reach the store.
///
/// The destination index is assigned as the new position verbatim; sibling
/// tasks are not renumbered.
pub fn compute_move(
    current_status: TaskStatus,
    current_position: i32,
    dest_status: TaskStatus,
    dest_index: i32,
) -> Option<TaskMove> {
    if current_status == dest_status && current_position == dest_index {
        return None;
    }

    Some(TaskMove {
        status: dest_status,
        position: dest_index,
    })
}

/// Checks whether an identity may view a project
///
/// True iff the identity owns the project or holds a membership row in it.
/// The owner check does not depend on the membership row existing, so an
/// owner can always see their own project.
pub fn can_view(user_id: Uuid, project: &Project, memberships: &[Membership]) -> bool {
    if project.owner_id == user_id {
        return true;
    }

    memberships
        .iter()
        .any(|m| m.project_id == project.id && m.user_id == user_id)
}

/// Checks whether an identity may be assigned to a task in a project
///
/// True iff the identity holds a membership in the task's project.
pub fn can_assign(assignee_id: Uuid, project_id: Uuid, memberships: &[Membership]) -> bool {
    memberships
        .iter()
        .any(|m| m.project_id == project_id && m.user_id == assignee_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::membership::ProjectRole;
    use std::collections::HashSet;

    fn task(status: TaskStatus, position: i32) -> Task {
        Task {
            id: Uuid::new_v4(),
            board_id: Uuid::nil(),
            title: format!("{} #{}", status.as_str(), position),
            description: None,
            status,
            position,
            due_date: None,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Membership {
        Membership {
            project_id,
            user_id,
            role,
            created_at: Utc::now(),
        }
    }

    fn project(owner_id: Uuid) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Acme".to_string(),
            description: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partition_is_total_nonoverlapping_cover() {
        let tasks = vec![
            task(TaskStatus::Todo, 1),
            task(TaskStatus::Done, 0),
            task(TaskStatus::Todo, 0),
            task(TaskStatus::Review, 2),
            task(TaskStatus::InProgress, 0),
        ];
        let input_ids: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();

        let columns = partition(tasks, &TaskStatus::ALL);

        let mut seen = HashSet::new();
        for (status, column) in &columns {
            for t in column {
                assert_eq!(t.status, *status);
                assert!(seen.insert(t.id), "task appeared in two columns");
            }
        }
        assert_eq!(seen, input_ids);
    }

    #[test]
    fn test_partition_orders_columns_by_position() {
        let tasks = vec![
            task(TaskStatus::Todo, 3),
            task(TaskStatus::Todo, 0),
            task(TaskStatus::Todo, 1),
        ];

        let columns = partition(tasks, &TaskStatus::ALL);
        let todo = &columns[0].1;

        let positions: Vec<i32> = todo.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 3]);
    }

    #[test]
    fn test_partition_includes_empty_columns() {
        let columns = partition(vec![task(TaskStatus::Done, 0)], &TaskStatus::ALL);

        assert_eq!(columns.len(), 4);
        assert!(columns[0].1.is_empty()); // todo
        assert!(columns[1].1.is_empty()); // in_progress
        assert!(columns[2].1.is_empty()); // review
        assert_eq!(columns[3].1.len(), 1); // done
    }

    #[test]
    fn test_partition_duplicate_positions_tiebreak_by_creation() {
        // The accepted post-move state: two siblings sharing a position.
        let older = task(TaskStatus::Todo, 1);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = task(TaskStatus::Todo, 1);
        let older_id = older.id;

        let columns = partition(vec![newer, older], &TaskStatus::ALL);
        assert_eq!(columns[0].1[0].id, older_id);
    }

    #[test]
    fn test_insert_position_empty_column() {
        let empty: Vec<Task> = vec![];
        assert_eq!(insert_position(&empty), 0);
    }

    #[test]
    fn test_insert_position_appends_after_max() {
        let existing = vec![task(TaskStatus::Todo, 0), task(TaskStatus::Todo, 2)];
        assert_eq!(insert_position(&existing), 3);
    }

    #[test]
    fn test_insert_position_contiguous_column() {
        let existing = vec![task(TaskStatus::Todo, 0), task(TaskStatus::Todo, 1)];
        assert_eq!(insert_position(&existing), 2);
    }

    #[test]
    fn test_compute_move_same_spot_is_noop() {
        assert_eq!(
            compute_move(TaskStatus::Todo, 2, TaskStatus::Todo, 2),
            None
        );
    }

    #[test]
    fn test_compute_move_within_column() {
        let mv = compute_move(TaskStatus::Todo, 2, TaskStatus::Todo, 0).unwrap();
        assert_eq!(mv.status, TaskStatus::Todo);
        assert_eq!(mv.position, 0);
    }

    #[test]
    fn test_compute_move_across_columns_keeps_index_verbatim() {
        // Same index in a different column is a real move.
        let mv = compute_move(TaskStatus::Todo, 2, TaskStatus::Review, 2).unwrap();
        assert_eq!(mv.status, TaskStatus::Review);
        assert_eq!(mv.position, 2);
    }

    #[test]
    fn test_can_view_owner_without_membership_rows() {
        let owner = Uuid::new_v4();
        let p = project(owner);

        assert!(can_view(owner, &p, &[]));
    }

    #[test]
    fn test_can_view_member() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let p = project(owner);
        let ms = vec![membership(p.id, member, ProjectRole::Member)];

        assert!(can_view(member, &p, &ms));
    }

    #[test]
    fn test_can_view_stranger_denied() {
        let p = project(Uuid::new_v4());
        let member = Uuid::new_v4();
        let ms = vec![membership(p.id, member, ProjectRole::Member)];

        assert!(!can_view(Uuid::new_v4(), &p, &ms));
    }

    #[test]
    fn test_can_view_ignores_other_projects_memberships() {
        let p = project(Uuid::new_v4());
        let user = Uuid::new_v4();
        // Membership in some other project grants nothing here.
        let ms = vec![membership(Uuid::new_v4(), user, ProjectRole::Owner)];

        assert!(!can_view(user, &p, &ms));
    }

    #[test]
    fn test_can_assign_requires_membership() {
        let project_id = Uuid::new_v4();
        let member = Uuid::new_v4();
        let ms = vec![membership(project_id, member, ProjectRole::Member)];

        assert!(can_assign(member, project_id, &ms));
        assert!(!can_assign(Uuid::new_v4(), project_id, &ms));
    }
}
