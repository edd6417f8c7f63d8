//! Core domain logic for Taku, a local-first task board and time tracker.
//! This crate is the single source of truth for workspace state: it mediates
//! every read/write against embedded storage, keeps the in-memory mirror the
//! UI renders from, and derives streak/heatmap/progress views on demand.

pub mod analytics;
pub mod backup;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::heatmap::{
    activity_level, build_heatmap, current_streak, longest_streak, HeatmapDay,
};
pub use analytics::progress::{
    monthly_task_progress, weekly_progress, MonthlyProgress, WeeklyProgress,
};
pub use backup::{
    export_file_name, export_workspace, import_merge, import_merge_at, import_overwrite,
    import_overwrite_at, last_export_at, parse_document, to_json, BackupError, BackupResult,
    ExportDocument, EXPORT_VERSION,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{seed_tasks_for_role, Priority, SeedTask, Task, TaskId};
pub use model::time_entry::{TimeEntry, TimeEntryId};
pub use model::workspace::{
    default_columns, Role, Settings, Theme, Workspace, WorkspaceId, DEFAULT_WEEKLY_GOALS,
    TERMINAL_COLUMN,
};
pub use model::ValidationError;
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::time_entry_repo::{SqliteTimeEntryRepository, TimeEntryRepository};
pub use repo::workspace_repo::{SqliteWorkspaceRepository, WorkspaceRepository};
pub use repo::{RepoError, RepoResult};
pub use service::workspace_service::{
    elapsed_minutes, NewTask, NewTimeEntry, NewWorkspace, SettingsPatch, StoreError, StoreResult,
    TaskPatch, TimeEntryPatch, WorkspaceService, WorkspaceUpdate,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
