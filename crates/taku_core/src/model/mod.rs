//! Domain model for workspaces, tasks and time entries.
//!
//! # Responsibility
//! - Define the canonical records mirrored between storage and memory.
//! - Provide validation shared by repository write paths.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Timestamps are unix epoch milliseconds.
//! - A task's `(is_active, start_time)` pair is either `(false, None)` or
//!   `(true, Some(_))`; no other combination is valid.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod task;
pub mod time_entry;
pub mod workspace;

/// Validation failures shared by all domain records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Task title is empty after trimming.
    EmptyTaskTitle,
    /// Workspace name is empty after trimming.
    EmptyWorkspaceName,
    /// Workspace owner name is empty after trimming.
    EmptyOwnerName,
    /// Weekly goal must be a positive number of hours.
    InvalidWeeklyGoals(u32),
    /// Workspace must declare at least one column.
    EmptyColumns,
    /// Time entry duration must be non-negative.
    NegativeDuration(i64),
    /// Time entry end must not precede its start.
    EntryEndBeforeStart { start: i64, end: i64 },
    /// `is_active` and `start_time` disagree about timer state.
    TimerStateMismatch,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTaskTitle => write!(f, "task title cannot be empty"),
            Self::EmptyWorkspaceName => write!(f, "workspace name cannot be empty"),
            Self::EmptyOwnerName => write!(f, "workspace owner name cannot be empty"),
            Self::InvalidWeeklyGoals(value) => {
                write!(f, "weekly goal must be positive, got {value}")
            }
            Self::EmptyColumns => write!(f, "workspace must declare at least one column"),
            Self::NegativeDuration(value) => {
                write!(f, "time entry duration must be non-negative, got {value}")
            }
            Self::EntryEndBeforeStart { start, end } => {
                write!(f, "time entry end {end} precedes start {start}")
            }
            Self::TimerStateMismatch => {
                write!(f, "task timer state is inconsistent: is_active and start_time disagree")
            }
        }
    }
}

impl Error for ValidationError {}

/// Returns the current wall clock as unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
