//! Time entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and workspace/task-scoped operations over `time_entries`.
//!
//! # Invariants
//! - Write paths call `TimeEntry::validate()` before SQL mutations.
//! - Listing order is deterministic: `start_time ASC, uuid ASC`.

use crate::model::task::TaskId;
use crate::model::time_entry::{TimeEntry, TimeEntryId};
use crate::model::workspace::WorkspaceId;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    workspace_uuid,
    task_uuid,
    start_time,
    end_time,
    duration,
    description
FROM time_entries";

/// Repository interface for time entry rows.
pub trait TimeEntryRepository {
    fn insert_entry(&self, entry: &TimeEntry) -> RepoResult<TimeEntryId>;
    /// Full-row update keyed by `uuid`.
    fn update_entry(&self, entry: &TimeEntry) -> RepoResult<()>;
    fn list_entries(&self, workspace_uuid: WorkspaceId) -> RepoResult<Vec<TimeEntry>>;
    fn delete_entry(&self, id: TimeEntryId) -> RepoResult<()>;
    /// Cascade helper: removes every entry referencing the task.
    fn delete_entries_for_task(&self, task_uuid: TaskId) -> RepoResult<usize>;
}

/// SQLite-backed time entry repository.
pub struct SqliteTimeEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTimeEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TimeEntryRepository for SqliteTimeEntryRepository<'_> {
    fn insert_entry(&self, entry: &TimeEntry) -> RepoResult<TimeEntryId> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO time_entries (
                uuid,
                workspace_uuid,
                task_uuid,
                start_time,
                end_time,
                duration,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                entry.uuid.to_string(),
                entry.workspace_uuid.to_string(),
                entry.task_uuid.to_string(),
                entry.start_time,
                entry.end_time,
                entry.duration,
                entry.description.as_deref(),
            ],
        )?;

        Ok(entry.uuid)
    }

    fn update_entry(&self, entry: &TimeEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE time_entries
             SET
                task_uuid = ?1,
                start_time = ?2,
                end_time = ?3,
                duration = ?4,
                description = ?5
             WHERE uuid = ?6;",
            params![
                entry.task_uuid.to_string(),
                entry.start_time,
                entry.end_time,
                entry.duration,
                entry.description.as_deref(),
                entry.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound(entry.uuid));
        }

        Ok(())
    }

    fn list_entries(&self, workspace_uuid: WorkspaceId) -> RepoResult<Vec<TimeEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE workspace_uuid = ?1
             ORDER BY start_time ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([workspace_uuid.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn delete_entry(&self, id: TimeEntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM time_entries WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound(id));
        }

        Ok(())
    }

    fn delete_entries_for_task(&self, task_uuid: TaskId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM time_entries WHERE task_uuid = ?1;",
            [task_uuid.to_string()],
        )?;
        Ok(changed)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<TimeEntry> {
    let uuid_text: String = row.get("uuid")?;
    let workspace_text: String = row.get("workspace_uuid")?;
    let task_text: String = row.get("task_uuid")?;

    let entry = TimeEntry {
        uuid: parse_uuid(&uuid_text, "time_entries.uuid")?,
        workspace_uuid: parse_uuid(&workspace_text, "time_entries.workspace_uuid")?,
        task_uuid: parse_uuid(&task_text, "time_entries.task_uuid")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        duration: row.get("duration")?,
        description: row.get("description")?,
    };
    entry.validate()?;
    Ok(entry)
}
