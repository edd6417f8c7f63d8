//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and workspace-scoped listing over the `tasks` table.
//! - Keep priority mapping and row parsing inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Listing order is deterministic: `created_at ASC, uuid ASC`.

use crate::model::task::{Priority, Task, TaskId};
use crate::model::workspace::WorkspaceId;
use crate::repo::{bool_to_int, parse_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    workspace_uuid,
    title,
    description,
    column_name,
    priority,
    due_date,
    created_at,
    updated_at,
    time_spent,
    is_active,
    start_time
FROM tasks";

/// Repository interface for task rows.
pub trait TaskRepository {
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Full-row update keyed by `uuid`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn list_tasks(&self, workspace_uuid: WorkspaceId) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Removes every task in the workspace; returns the number deleted.
    fn delete_tasks_for_workspace(&self, workspace_uuid: WorkspaceId) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                workspace_uuid,
                title,
                description,
                column_name,
                priority,
                due_date,
                created_at,
                updated_at,
                time_spent,
                is_active,
                start_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                task.uuid.to_string(),
                task.workspace_uuid.to_string(),
                task.title.as_str(),
                task.description.as_deref(),
                task.column.as_str(),
                priority_to_db(task.priority),
                task.due_date,
                task.created_at,
                task.updated_at,
                task.time_spent,
                bool_to_int(task.is_active),
                task.start_time,
            ],
        )?;

        Ok(task.uuid)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                column_name = ?3,
                priority = ?4,
                due_date = ?5,
                updated_at = ?6,
                time_spent = ?7,
                is_active = ?8,
                start_time = ?9
             WHERE uuid = ?10;",
            params![
                task.title.as_str(),
                task.description.as_deref(),
                task.column.as_str(),
                priority_to_db(task.priority),
                task.due_date,
                task.updated_at,
                task.time_spent,
                bool_to_int(task.is_active),
                task.start_time,
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(task.uuid));
        }

        Ok(())
    }

    fn list_tasks(&self, workspace_uuid: WorkspaceId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE workspace_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;"
        ))?;

        let mut rows = stmt.query([workspace_uuid.to_string()])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }

        Ok(())
    }

    fn delete_tasks_for_workspace(&self, workspace_uuid: WorkspaceId) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE workspace_uuid = ?1;",
            [workspace_uuid.to_string()],
        )?;
        Ok(changed)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let workspace_text: String = row.get("workspace_uuid")?;

    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let task = Task {
        uuid: parse_uuid(&uuid_text, "tasks.uuid")?,
        workspace_uuid: parse_uuid(&workspace_text, "tasks.workspace_uuid")?,
        title: row.get("title")?,
        description: row.get("description")?,
        column: row.get("column_name")?,
        priority,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        time_spent: row.get("time_spent")?,
        is_active: parse_bool(row.get("is_active")?, "tasks.is_active")?,
        start_time: row.get("start_time")?,
    };
    task.validate()?;
    Ok(task)
}

fn priority_to_db(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "low",
        Priority::Medium => "medium",
        Priority::High => "high",
    }
}

fn parse_priority(value: &str) -> Option<Priority> {
    match value {
        "low" => Some(Priority::Low),
        "medium" => Some(Priority::Medium),
        "high" => Some(Priority::High),
        _ => None,
    }
}
