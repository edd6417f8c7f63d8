//! Workspace domain model.
//!
//! # Responsibility
//! - Define the denormalized workspace shape used as the in-memory mirror and
//!   as the export document payload.
//! - Provide creation defaults (columns, goal, theme, settings flags).
//!
//! # Invariants
//! - `uuid` is stable and never reused for another workspace.
//! - Exactly one workspace is loaded into memory at a time; others stay
//!   addressable by id in storage.
//! - Serialized field names follow the portable camelCase document format.

use crate::model::task::Task;
use crate::model::time_entry::TimeEntry;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a workspace.
pub type WorkspaceId = Uuid;

/// Column label that marks a task as completed for analytics purposes.
pub const TERMINAL_COLUMN: &str = "Done";

/// Default weekly tracked-time goal in hours.
pub const DEFAULT_WEEKLY_GOALS: u32 = 10;

/// Owner role selected at workspace creation; drives seeded starter tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Developer,
    Designer,
    Other,
}

/// UI theme preference persisted on the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    System,
    Light,
    Dark,
}

/// Feature flags persisted on the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub heatmap: bool,
    pub mascot: bool,
    pub auto_backup: bool,
    pub compact_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heatmap: true,
            mascot: true,
            auto_backup: false,
            compact_mode: false,
        }
    }
}

/// Denormalized workspace record embedding its tasks and time entries.
///
/// Storage keeps the three collections normalized; this shape is rebuilt on
/// load and is what the export document serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(rename = "id")]
    pub uuid: WorkspaceId,
    pub name: String,
    pub owner_name: String,
    pub role: Role,
    pub created_at: i64,
    pub columns: Vec<String>,
    pub weekly_goals: u32,
    pub theme: Theme,
    pub settings: Settings,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}

impl Workspace {
    /// Creates a workspace shell with creation defaults and no collections.
    pub fn new(name: impl Into<String>, owner_name: impl Into<String>, role: Role, now_ms: i64) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            owner_name: owner_name.into(),
            role,
            created_at: now_ms,
            columns: default_columns(),
            weekly_goals: DEFAULT_WEEKLY_GOALS,
            theme: Theme::System,
            settings: Settings::default(),
            tasks: Vec::new(),
            time_entries: Vec::new(),
        }
    }

    /// Validates workspace scalar fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyWorkspaceName);
        }
        if self.owner_name.trim().is_empty() {
            return Err(ValidationError::EmptyOwnerName);
        }
        if self.weekly_goals == 0 {
            return Err(ValidationError::InvalidWeeklyGoals(self.weekly_goals));
        }
        if self.columns.is_empty() {
            return Err(ValidationError::EmptyColumns);
        }
        Ok(())
    }
}

/// Returns the default kanban column set for a new workspace.
pub fn default_columns() -> Vec<String> {
    vec![
        "Todo".to_string(),
        "In Progress".to_string(),
        TERMINAL_COLUMN.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_columns, Role, Workspace};

    #[test]
    fn new_workspace_gets_creation_defaults() {
        let ws = Workspace::new("Side projects", "Aki", Role::Developer, 1_700_000_000_000);
        assert_eq!(ws.columns, default_columns());
        assert_eq!(ws.weekly_goals, super::DEFAULT_WEEKLY_GOALS);
        assert!(ws.settings.heatmap);
        assert!(!ws.settings.auto_backup);
        assert!(ws.tasks.is_empty());
        assert!(ws.time_entries.is_empty());
        ws.validate().expect("defaults should validate");
    }

    #[test]
    fn validate_rejects_blank_name_and_zero_goal() {
        let mut ws = Workspace::new(" ", "Aki", Role::Other, 0);
        assert!(ws.validate().is_err());

        ws.name = "ok".to_string();
        ws.weekly_goals = 0;
        assert!(ws.validate().is_err());
    }
}
