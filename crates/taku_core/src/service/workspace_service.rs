//! Workspace state manager.
//!
//! # Responsibility
//! - Own the SQLite connection and the in-memory mirror of the current
//!   workspace.
//! - Expose every mutation over the workspace and its nested collections,
//!   keeping mirror and storage in sync after each completed call.
//!
//! # Invariants
//! - At most one task per workspace has a running timer (`is_active=true`).
//! - Storage is written before the mirror; a failed persist leaves the mirror
//!   untouched.
//! - Multi-step logical operations (create + seed, cascade delete, timer
//!   preemption) run inside one SQLite transaction.
//! - Timer preemption never records a time entry; only an explicit stop does.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::task::{seed_tasks_for_role, Priority, Task, TaskId};
use crate::model::time_entry::{TimeEntry, TimeEntryId};
use crate::model::workspace::{Role, Settings, Theme, Workspace, WorkspaceId};
use crate::model::{now_epoch_ms, ValidationError};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::time_entry_repo::{SqliteTimeEntryRepository, TimeEntryRepository};
use crate::repo::workspace_repo::{SqliteWorkspaceRepository, WorkspaceRepository};
use crate::repo::RepoError;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Service error for workspace store use-cases.
#[derive(Debug)]
pub enum StoreError {
    /// Requested workspace id does not exist in storage.
    WorkspaceNotFound(WorkspaceId),
    /// Referenced task is not part of the current workspace.
    TaskNotFound(TaskId),
    /// Referenced time entry is not part of the current workspace.
    EntryNotFound(TimeEntryId),
    /// Input failed domain validation; nothing was written.
    Validation(ValidationError),
    /// Storage bootstrap or transaction failure.
    Db(DbError),
    /// Persistence-layer failure not covered by a semantic variant.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkspaceNotFound(id) => write!(f, "workspace not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::EntryNotFound(id) => write!(f, "time entry not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::WorkspaceNotFound(id) => Self::WorkspaceNotFound(id),
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::EntryNotFound(id) => Self::EntryNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Db(err),
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Request model for workspace creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkspace {
    pub name: String,
    pub owner_name: String,
    pub role: Role,
}

/// Request model for task creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub column: String,
    pub priority: Priority,
    pub due_date: Option<i64>,
}

/// Partial task update. `None` keeps the current value; for nullable fields
/// the inner option distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub column: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<i64>>,
}

/// Tagged workspace-level update command.
///
/// Each variant maps to exactly one persisted column, which keeps the merge
/// logic explicit and exhaustively checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceUpdate {
    Settings(SettingsPatch),
    WeeklyGoals(u32),
    Columns(Vec<String>),
}

/// Partial settings-flag update, merged shallowly into existing settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub heatmap: Option<bool>,
    pub mascot: Option<bool>,
    pub auto_backup: Option<bool>,
    pub compact_mode: Option<bool>,
}

impl SettingsPatch {
    fn apply(self, settings: &mut Settings) {
        if let Some(value) = self.heatmap {
            settings.heatmap = value;
        }
        if let Some(value) = self.mascot {
            settings.mascot = value;
        }
        if let Some(value) = self.auto_backup {
            settings.auto_backup = value;
        }
        if let Some(value) = self.compact_mode {
            settings.compact_mode = value;
        }
    }
}

/// Request model for manual time entry creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub task_uuid: TaskId,
    pub start_time: i64,
    pub end_time: Option<i64>,
    /// Minutes; derived from the span when omitted and `end_time` is set.
    pub duration: Option<i64>,
    pub description: Option<String>,
}

/// Partial time entry update; same `None`-keeps semantics as [`TaskPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntryPatch {
    pub task_uuid: Option<TaskId>,
    pub start_time: Option<i64>,
    pub end_time: Option<Option<i64>>,
    pub duration: Option<i64>,
    pub description: Option<Option<String>>,
}

/// Workspace state manager owning the connection and the in-memory mirror.
pub struct WorkspaceService {
    conn: Connection,
    current: Option<Workspace>,
}

impl WorkspaceService {
    /// Opens a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
            current: None,
        })
    }

    /// Opens an in-memory store, used by tests and previews.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
            current: None,
        })
    }

    /// Returns the in-memory mirror of the current workspace, if loaded.
    pub fn current(&self) -> Option<&Workspace> {
        self.current.as_ref()
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Creates a workspace with role-appropriate starter tasks and makes it
    /// current.
    ///
    /// Workspace row and seeded tasks are written in one transaction.
    pub fn create_workspace(&mut self, request: NewWorkspace) -> StoreResult<WorkspaceId> {
        let now = now_epoch_ms();
        let mut workspace = Workspace::new(request.name, request.owner_name, request.role, now);
        workspace.validate()?;

        workspace.tasks = seed_tasks_for_role(request.role)
            .iter()
            .map(|seed| Task::new(workspace.uuid, seed.title, seed.column, seed.priority, now))
            .collect();

        let tx = self.conn.transaction()?;
        {
            let workspace_repo = SqliteWorkspaceRepository::new(&tx);
            workspace_repo.insert_workspace(&workspace)?;
            let task_repo = SqliteTaskRepository::new(&tx);
            for task in &workspace.tasks {
                task_repo.insert_task(task)?;
            }
        }
        tx.commit()?;

        let id = workspace.uuid;
        self.current = Some(workspace);
        info!("event=workspace_create module=service status=ok workspace={id}");
        Ok(id)
    }

    /// Loads a workspace by id, replacing the mirror wholesale.
    pub fn load_workspace(&mut self, id: WorkspaceId) -> StoreResult<()> {
        let workspace_repo = SqliteWorkspaceRepository::new(&self.conn);
        let mut workspace = workspace_repo
            .get_workspace(id)?
            .ok_or(StoreError::WorkspaceNotFound(id))?;

        workspace.tasks = SqliteTaskRepository::new(&self.conn).list_tasks(id)?;
        workspace.time_entries = SqliteTimeEntryRepository::new(&self.conn).list_entries(id)?;

        let tasks = workspace.tasks.len();
        let entries = workspace.time_entries.len();
        self.current = Some(workspace);
        info!(
            "event=workspace_load module=service status=ok workspace={id} tasks={tasks} entries={entries}"
        );
        Ok(())
    }

    /// Applies one workspace-level update command.
    ///
    /// No-ops when no workspace is loaded.
    pub fn update_workspace(&mut self, update: WorkspaceUpdate) -> StoreResult<()> {
        let Some(workspace) = self.current.as_ref() else {
            return Ok(());
        };
        let id = workspace.uuid;

        match update {
            WorkspaceUpdate::Settings(patch) => {
                let mut settings = workspace.settings;
                patch.apply(&mut settings);
                SqliteWorkspaceRepository::new(&self.conn).update_settings(id, &settings)?;
                if let Some(workspace) = self.current.as_mut() {
                    workspace.settings = settings;
                }
            }
            WorkspaceUpdate::WeeklyGoals(goal) => {
                if goal == 0 {
                    return Err(ValidationError::InvalidWeeklyGoals(goal).into());
                }
                SqliteWorkspaceRepository::new(&self.conn).update_weekly_goals(id, goal)?;
                if let Some(workspace) = self.current.as_mut() {
                    workspace.weekly_goals = goal;
                }
            }
            WorkspaceUpdate::Columns(columns) => {
                if columns.is_empty() {
                    return Err(ValidationError::EmptyColumns.into());
                }
                SqliteWorkspaceRepository::new(&self.conn).update_columns(id, &columns)?;
                if let Some(workspace) = self.current.as_mut() {
                    workspace.columns = columns;
                }
            }
        }

        Ok(())
    }

    /// Persists and mirrors the theme field. No-ops when nothing is loaded.
    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        let Some(workspace) = self.current.as_ref() else {
            return Ok(());
        };
        let id = workspace.uuid;

        SqliteWorkspaceRepository::new(&self.conn).update_theme(id, theme)?;
        if let Some(workspace) = self.current.as_mut() {
            workspace.theme = theme;
        }
        Ok(())
    }

    /// Adds a task to the current workspace.
    ///
    /// Returns `Ok(None)` when no workspace is loaded.
    pub fn add_task(&mut self, request: NewTask) -> StoreResult<Option<TaskId>> {
        let Some(workspace) = self.current.as_ref() else {
            return Ok(None);
        };

        let now = now_epoch_ms();
        let mut task = Task::new(
            workspace.uuid,
            request.title,
            request.column,
            request.priority,
            now,
        );
        task.description = request.description;
        task.due_date = request.due_date;

        SqliteTaskRepository::new(&self.conn).insert_task(&task)?;

        let id = task.uuid;
        if let Some(workspace) = self.current.as_mut() {
            workspace.tasks.push(task);
        }
        Ok(Some(id))
    }

    /// Merges a patch into the task and stamps `updated_at`, regardless of
    /// which fields changed.
    ///
    /// Column membership in the workspace's declared columns is not checked;
    /// that contract belongs to callers.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> StoreResult<()> {
        let mut task = self.find_task(id)?.clone();

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(column) = patch.column {
            task.column = column;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = now_epoch_ms();

        SqliteTaskRepository::new(&self.conn).update_task(&task)?;
        self.replace_mirror_task(task);
        Ok(())
    }

    /// Moves a task to another column; sugar over [`Self::update_task`].
    pub fn move_task(&mut self, id: TaskId, column: impl Into<String>) -> StoreResult<()> {
        self.update_task(
            id,
            TaskPatch {
                column: Some(column.into()),
                ..TaskPatch::default()
            },
        )
    }

    /// Deletes a task and cascades to its time entries in one transaction.
    pub fn delete_task(&mut self, id: TaskId) -> StoreResult<()> {
        self.find_task(id)?;

        let tx = self.conn.transaction()?;
        {
            let entry_repo = SqliteTimeEntryRepository::new(&tx);
            entry_repo.delete_entries_for_task(id)?;
            let task_repo = SqliteTaskRepository::new(&tx);
            task_repo.delete_task(id)?;
        }
        tx.commit()?;

        if let Some(workspace) = self.current.as_mut() {
            workspace.tasks.retain(|task| task.uuid != id);
            workspace.time_entries.retain(|entry| entry.task_uuid != id);
        }
        Ok(())
    }

    /// Starts the task's timer at the current wall clock.
    pub fn start_timer(&mut self, id: TaskId) -> StoreResult<()> {
        self.start_timer_at(id, now_epoch_ms())
    }

    /// Starts the task's timer, first forcing every other running task in
    /// the workspace back to idle.
    ///
    /// Preempted tasks go through the plain task-update path on purpose: no
    /// time entry is recorded for an interrupted session. Starting an
    /// already-running task is a no-op (there is no Running -> Running
    /// transition).
    pub fn start_timer_at(&mut self, id: TaskId, now_ms: i64) -> StoreResult<()> {
        let target = self.find_task(id)?;
        if target.is_active {
            return Ok(());
        }

        let mut updated: Vec<Task> = Vec::new();
        if let Some(workspace) = self.current.as_ref() {
            for task in &workspace.tasks {
                if task.is_active && task.uuid != id {
                    let mut stopped = task.clone();
                    stopped.is_active = false;
                    stopped.start_time = None;
                    stopped.updated_at = now_ms;
                    updated.push(stopped);
                }
            }
        }

        let mut target = self.find_task(id)?.clone();
        target.is_active = true;
        target.start_time = Some(now_ms);
        target.updated_at = now_ms;
        updated.push(target);

        let tx = self.conn.transaction()?;
        {
            let task_repo = SqliteTaskRepository::new(&tx);
            for task in &updated {
                task_repo.update_task(task)?;
            }
        }
        tx.commit()?;

        for task in updated {
            self.replace_mirror_task(task);
        }
        Ok(())
    }

    /// Stops the task's timer at the current wall clock.
    pub fn stop_timer(&mut self, id: TaskId) -> StoreResult<Option<TimeEntry>> {
        self.stop_timer_at(id, now_epoch_ms())
    }

    /// Stops the task's timer, accumulating elapsed minutes and recording a
    /// time entry for the session.
    ///
    /// Returns `Ok(None)` without touching anything when the task is idle.
    pub fn stop_timer_at(&mut self, id: TaskId, now_ms: i64) -> StoreResult<Option<TimeEntry>> {
        let task = self.find_task(id)?;
        let Some(start) = task.start_time else {
            return Ok(None);
        };
        if !task.is_active {
            return Ok(None);
        }

        let elapsed = elapsed_minutes(start, now_ms);
        let mut task = task.clone();
        task.is_active = false;
        task.start_time = None;
        task.time_spent += elapsed;
        task.updated_at = now_ms;

        let mut entry = TimeEntry::new(task.workspace_uuid, id, start, now_ms, elapsed);
        entry.description = Some(format!("Worked on {}", task.title));

        let tx = self.conn.transaction()?;
        {
            SqliteTaskRepository::new(&tx).update_task(&task)?;
            SqliteTimeEntryRepository::new(&tx).insert_entry(&entry)?;
        }
        tx.commit()?;

        self.replace_mirror_task(task);
        if let Some(workspace) = self.current.as_mut() {
            workspace.time_entries.push(entry.clone());
        }
        info!(
            "event=timer_stop module=service status=ok task={id} minutes={elapsed}"
        );
        Ok(Some(entry))
    }

    /// Adds a manual time entry to the current workspace.
    ///
    /// Returns `Ok(None)` when no workspace is loaded. The stored duration is
    /// the explicit value when given, otherwise derived from the span.
    pub fn add_time_entry(&mut self, request: NewTimeEntry) -> StoreResult<Option<TimeEntryId>> {
        let Some(workspace) = self.current.as_ref() else {
            return Ok(None);
        };

        let duration = request.duration.unwrap_or_else(|| match request.end_time {
            Some(end) => elapsed_minutes(request.start_time, end),
            None => 0,
        });

        let entry = TimeEntry {
            uuid: uuid::Uuid::new_v4(),
            workspace_uuid: workspace.uuid,
            task_uuid: request.task_uuid,
            start_time: request.start_time,
            end_time: request.end_time,
            duration,
            description: request.description,
        };

        SqliteTimeEntryRepository::new(&self.conn).insert_entry(&entry)?;

        let id = entry.uuid;
        if let Some(workspace) = self.current.as_mut() {
            workspace.time_entries.push(entry);
        }
        Ok(Some(id))
    }

    /// Merges a patch into an existing time entry.
    pub fn update_time_entry(&mut self, id: TimeEntryId, patch: TimeEntryPatch) -> StoreResult<()> {
        let mut entry = self.find_entry(id)?.clone();

        if let Some(task_uuid) = patch.task_uuid {
            entry.task_uuid = task_uuid;
        }
        if let Some(start_time) = patch.start_time {
            entry.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            entry.end_time = end_time;
        }
        if let Some(duration) = patch.duration {
            entry.duration = duration;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }

        SqliteTimeEntryRepository::new(&self.conn).update_entry(&entry)?;

        if let Some(workspace) = self.current.as_mut() {
            if let Some(slot) = workspace
                .time_entries
                .iter_mut()
                .find(|candidate| candidate.uuid == id)
            {
                *slot = entry;
            }
        }
        Ok(())
    }

    /// Deletes one time entry.
    pub fn delete_time_entry(&mut self, id: TimeEntryId) -> StoreResult<()> {
        self.find_entry(id)?;

        SqliteTimeEntryRepository::new(&self.conn).delete_entry(id)?;

        if let Some(workspace) = self.current.as_mut() {
            workspace.time_entries.retain(|entry| entry.uuid != id);
        }
        Ok(())
    }

    fn find_task(&self, id: TaskId) -> StoreResult<&Task> {
        self.current
            .as_ref()
            .and_then(|workspace| workspace.tasks.iter().find(|task| task.uuid == id))
            .ok_or(StoreError::TaskNotFound(id))
    }

    fn find_entry(&self, id: TimeEntryId) -> StoreResult<&TimeEntry> {
        self.current
            .as_ref()
            .and_then(|workspace| {
                workspace
                    .time_entries
                    .iter()
                    .find(|entry| entry.uuid == id)
            })
            .ok_or(StoreError::EntryNotFound(id))
    }

    fn replace_mirror_task(&mut self, task: Task) {
        if let Some(workspace) = self.current.as_mut() {
            if let Some(slot) = workspace
                .tasks
                .iter_mut()
                .find(|candidate| candidate.uuid == task.uuid)
            {
                *slot = task;
            }
        }
    }
}

/// Whole minutes between two epoch-millisecond instants, rounded to nearest.
///
/// Rounding (not flooring) matches the displayed accounting: 90 seconds of
/// tracked time becomes 2 minutes.
pub fn elapsed_minutes(start_ms: i64, end_ms: i64) -> i64 {
    (((end_ms - start_ms) as f64) / 60_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::elapsed_minutes;

    #[test]
    fn elapsed_minutes_rounds_to_nearest() {
        assert_eq!(elapsed_minutes(0, 90_000), 2);
        assert_eq!(elapsed_minutes(0, 89_000), 1);
        assert_eq!(elapsed_minutes(0, 29_000), 0);
        assert_eq!(elapsed_minutes(0, 30_000), 1);
        assert_eq!(elapsed_minutes(0, 0), 0);
    }
}
