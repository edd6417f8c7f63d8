//! Time entry domain model.
//!
//! # Responsibility
//! - Define the tracked-time record linking a task to a time span.
//!
//! # Invariants
//! - `duration` is stored redundantly in minutes and is authoritative for
//!   display, even when it disagrees with `end_time - start_time`.
//! - `task_uuid` may dangle only transiently; deleting a task cascades to its
//!   entries through the workspace service.

use crate::model::task::TaskId;
use crate::model::workspace::WorkspaceId;
use crate::model::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a time entry.
pub type TimeEntryId = Uuid;

/// Tracked-time record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    #[serde(rename = "id")]
    pub uuid: TimeEntryId,
    #[serde(rename = "workspaceId")]
    pub workspace_uuid: WorkspaceId,
    #[serde(rename = "taskId")]
    pub task_uuid: TaskId,
    pub start_time: i64,
    #[serde(default)]
    pub end_time: Option<i64>,
    /// Minutes; derived from the span at creation but stored on its own.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimeEntry {
    /// Creates a closed entry spanning `start_time..end_time`.
    pub fn new(
        workspace_uuid: WorkspaceId,
        task_uuid: TaskId,
        start_time: i64,
        end_time: i64,
        duration: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            workspace_uuid,
            task_uuid,
            start_time,
            end_time: Some(end_time),
            duration,
            description: None,
        }
    }

    /// Validates span ordering and duration sign.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration < 0 {
            return Err(ValidationError::NegativeDuration(self.duration));
        }
        if let Some(end) = self.end_time {
            if end < self.start_time {
                return Err(ValidationError::EntryEndBeforeStart {
                    start: self.start_time,
                    end,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TimeEntry;
    use crate::model::ValidationError;
    use uuid::Uuid;

    #[test]
    fn validate_rejects_inverted_span() {
        let entry = TimeEntry::new(Uuid::new_v4(), Uuid::new_v4(), 1_000, 500, 0);
        assert_eq!(
            entry.validate(),
            Err(ValidationError::EntryEndBeforeStart {
                start: 1_000,
                end: 500
            })
        );
    }

    #[test]
    fn validate_rejects_negative_duration() {
        let mut entry = TimeEntry::new(Uuid::new_v4(), Uuid::new_v4(), 0, 1_000, 1);
        entry.duration = -5;
        assert_eq!(entry.validate(), Err(ValidationError::NegativeDuration(-5)));
    }
}
