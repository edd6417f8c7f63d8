//! Task domain model and role seed table.
//!
//! # Responsibility
//! - Define the kanban task record including its timer field pair.
//! - Provide the per-role starter task table used by workspace creation.
//!
//! # Invariants
//! - `start_time` is present iff `is_active` is true.
//! - `time_spent` accumulates whole minutes and never goes negative.
//! - `column` membership in the owning workspace's column list is a
//!   convention, not enforced here.

use crate::model::workspace::{Role, WorkspaceId};
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Task urgency marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Kanban task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "id")]
    pub uuid: TaskId,
    #[serde(rename = "workspaceId")]
    pub workspace_uuid: WorkspaceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub column: String,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<i64>,
    /// Defaults to 0 so import documents may omit timestamps; import replaces
    /// the zero with its own clock.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    /// Accumulated tracked minutes.
    #[serde(default)]
    pub time_spent: i64,
    /// Timer running marker; see module invariants.
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub start_time: Option<i64>,
}

impl Task {
    /// Creates an idle task in the given column with zero tracked time.
    pub fn new(
        workspace_uuid: WorkspaceId,
        title: impl Into<String>,
        column: impl Into<String>,
        priority: Priority,
        now_ms: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            title: title.into(),
            description: None,
            column: column.into(),
            priority,
            due_date: None,
            created_at: now_ms,
            updated_at: now_ms,
            time_spent: 0,
            is_active: false,
            start_time: None,
        }
    }

    /// Validates the task record including its timer field pair.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTaskTitle);
        }
        if self.is_active != self.start_time.is_some() {
            return Err(ValidationError::TimerStateMismatch);
        }
        Ok(())
    }

    /// Returns whether the task sits in the terminal column.
    pub fn is_done(&self) -> bool {
        self.column == crate::model::workspace::TERMINAL_COLUMN
    }
}

/// One row of the starter task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTask {
    pub title: &'static str,
    pub column: &'static str,
    pub priority: Priority,
}

/// Returns the three starter tasks seeded for a role at workspace creation.
///
/// The developer row "Add dark mode support" is seeded into "In Progress"
/// while every other seed starts in "Todo"; the upstream seed table reads
/// this way and the value is preserved literally.
pub fn seed_tasks_for_role(role: Role) -> [SeedTask; 3] {
    match role {
        Role::Developer => [
            SeedTask {
                title: "Fix bug in login API",
                column: "Todo",
                priority: Priority::High,
            },
            SeedTask {
                title: "Add dark mode support",
                column: "In Progress",
                priority: Priority::Medium,
            },
            SeedTask {
                title: "Refactor Kanban logic",
                column: "Todo",
                priority: Priority::Medium,
            },
        ],
        Role::Student => [
            SeedTask {
                title: "Finish math assignment",
                column: "Todo",
                priority: Priority::High,
            },
            SeedTask {
                title: "Review lecture notes",
                column: "Todo",
                priority: Priority::Medium,
            },
            SeedTask {
                title: "Prepare exam flashcards",
                column: "Todo",
                priority: Priority::Low,
            },
        ],
        Role::Designer => [
            SeedTask {
                title: "Sketch onboarding flow",
                column: "Todo",
                priority: Priority::High,
            },
            SeedTask {
                title: "Refine color palette",
                column: "Todo",
                priority: Priority::Medium,
            },
            SeedTask {
                title: "Collect UI inspiration",
                column: "Todo",
                priority: Priority::Low,
            },
        ],
        Role::Other => [
            SeedTask {
                title: "Plan the week",
                column: "Todo",
                priority: Priority::High,
            },
            SeedTask {
                title: "Organize workspace",
                column: "Todo",
                priority: Priority::Medium,
            },
            SeedTask {
                title: "Review personal goals",
                column: "Todo",
                priority: Priority::Low,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{seed_tasks_for_role, Priority, Task};
    use crate::model::workspace::Role;
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn validate_rejects_blank_title() {
        let task = Task::new(Uuid::new_v4(), "  ", "Todo", Priority::Low, 0);
        assert_eq!(task.validate(), Err(ValidationError::EmptyTaskTitle));
    }

    #[test]
    fn validate_rejects_timer_state_mismatch() {
        let mut task = Task::new(Uuid::new_v4(), "t", "Todo", Priority::Low, 0);
        task.is_active = true;
        assert_eq!(task.validate(), Err(ValidationError::TimerStateMismatch));

        task.is_active = false;
        task.start_time = Some(10);
        assert_eq!(task.validate(), Err(ValidationError::TimerStateMismatch));
    }

    #[test]
    fn developer_seeds_keep_the_in_progress_row() {
        let seeds = seed_tasks_for_role(Role::Developer);
        assert_eq!(seeds[0].title, "Fix bug in login API");
        assert_eq!(seeds[0].priority, Priority::High);
        assert_eq!(seeds[1].title, "Add dark mode support");
        assert_eq!(seeds[1].column, "In Progress");
        assert_eq!(seeds[2].column, "Todo");
    }
}
