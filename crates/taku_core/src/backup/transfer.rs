//! Export and import flows over the workspace store.
//!
//! # Responsibility
//! - Produce export envelopes from the loaded mirror and record the export
//!   side channel.
//! - Rebuild (overwrite mode) or extend (merge mode) a workspace from a
//!   parsed document, re-keying every identifier.
//!
//! # Invariants
//! - Overwrite mode always yields a brand-new workspace id.
//! - Merge mode binds imported rows to the currently loaded workspace.
//! - Entries whose task id cannot be remapped are dropped silently.

use crate::backup::document::{ExportDocument, EXPORT_VERSION};
use crate::backup::{BackupError, BackupResult};
use crate::model::task::{Task, TaskId};
use crate::model::time_entry::TimeEntry;
use crate::model::workspace::WorkspaceId;
use crate::model::now_epoch_ms;
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::repo::time_entry_repo::{SqliteTimeEntryRepository, TimeEntryRepository};
use crate::service::workspace_service::{
    NewWorkspace, SettingsPatch, WorkspaceService, WorkspaceUpdate,
};
use log::info;
use rusqlite::OptionalExtension;
use std::collections::HashMap;
use uuid::Uuid;

/// Snapshots the loaded workspace into an export envelope.
///
/// Records the export instant in the side channel keyed by workspace id.
pub fn export_workspace(service: &WorkspaceService) -> BackupResult<ExportDocument> {
    let Some(workspace) = service.current() else {
        return Err(BackupError::NoActiveWorkspace);
    };

    let now = chrono::Utc::now();
    service.connection().execute(
        "INSERT INTO export_log (workspace_uuid, exported_at)
         VALUES (?1, ?2)
         ON CONFLICT(workspace_uuid) DO UPDATE SET exported_at = excluded.exported_at;",
        rusqlite::params![workspace.uuid.to_string(), now.timestamp_millis()],
    )?;

    info!(
        "event=workspace_export module=backup status=ok workspace={}",
        workspace.uuid
    );
    Ok(ExportDocument {
        workspace: workspace.clone(),
        exported_at: now.to_rfc3339(),
        version: EXPORT_VERSION.to_string(),
    })
}

/// Returns the last export instant recorded for a workspace, if any.
pub fn last_export_at(
    service: &WorkspaceService,
    id: WorkspaceId,
) -> BackupResult<Option<i64>> {
    let exported_at = service
        .connection()
        .query_row(
            "SELECT exported_at FROM export_log WHERE workspace_uuid = ?1;",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(exported_at)
}

/// Reconstructs the document as a brand-new workspace at the current wall
/// clock.
pub fn import_overwrite(
    service: &mut WorkspaceService,
    document: &ExportDocument,
) -> BackupResult<WorkspaceId> {
    import_overwrite_at(service, document, now_epoch_ms())
}

/// Reconstructs the document as a brand-new workspace and loads it.
///
/// The workspace is created through the normal create path (which seeds role
/// defaults); the seeds are then replaced by the imported tasks inside one
/// transaction. When another workspace is already loaded the new one gets an
/// "(Imported)" name suffix. Missing task timestamps default to `now_ms`.
/// Returns the new workspace id.
pub fn import_overwrite_at(
    service: &mut WorkspaceService,
    document: &ExportDocument,
    now_ms: i64,
) -> BackupResult<WorkspaceId> {
    let source = &document.workspace;

    let name = if service.current().is_some() {
        format!("{} (Imported)", source.name)
    } else {
        source.name.clone()
    };

    let new_id = service.create_workspace(NewWorkspace {
        name,
        owner_name: source.owner_name.clone(),
        role: source.role,
    })?;

    // Carry the portable workspace-level fields over the manager's own
    // update path so their validation applies.
    if !source.columns.is_empty() {
        service.update_workspace(WorkspaceUpdate::Columns(source.columns.clone()))?;
    }
    if source.weekly_goals > 0 {
        service.update_workspace(WorkspaceUpdate::WeeklyGoals(source.weekly_goals))?;
    }
    service.update_workspace(WorkspaceUpdate::Settings(SettingsPatch {
        heatmap: Some(source.settings.heatmap),
        mascot: Some(source.settings.mascot),
        auto_backup: Some(source.settings.auto_backup),
        compact_mode: Some(source.settings.compact_mode),
    }))?;
    service.set_theme(source.theme)?;

    let imported_tasks;
    let imported_entries;
    {
        let tx = service.connection_mut().transaction()?;
        {
            let task_repo = SqliteTaskRepository::new(&tx);
            // Purge the role seeds; the snapshot replaces them wholesale.
            task_repo.delete_tasks_for_workspace(new_id)?;
            let task_map = insert_imported_tasks(&task_repo, &source.tasks, new_id, None, now_ms)?;

            let entry_repo = SqliteTimeEntryRepository::new(&tx);
            imported_entries =
                insert_remapped_entries(&entry_repo, &source.time_entries, new_id, &task_map)?;
            imported_tasks = task_map.len();
        }
        tx.commit()?;
    }

    service.load_workspace(new_id)?;
    info!(
        "event=import_overwrite module=backup status=ok workspace={new_id} tasks={imported_tasks} entries={imported_entries}"
    );
    Ok(new_id)
}

/// Merges the document into the loaded workspace at the current wall clock.
pub fn import_merge(service: &mut WorkspaceService, document: &ExportDocument) -> BackupResult<()> {
    import_merge_at(service, document, now_epoch_ms())
}

/// Merges the document's tasks and entries into the loaded workspace.
///
/// Imported task titles get an "(Imported)" suffix; entries referencing
/// tasks absent from the document's task list are dropped. Missing task
/// timestamps default to `now_ms`.
pub fn import_merge_at(
    service: &mut WorkspaceService,
    document: &ExportDocument,
    now_ms: i64,
) -> BackupResult<()> {
    let Some(workspace) = service.current() else {
        return Err(BackupError::NoActiveWorkspace);
    };
    let workspace_id = workspace.uuid;
    let source = &document.workspace;

    let imported_tasks;
    let imported_entries;
    {
        let tx = service.connection_mut().transaction()?;
        {
            let task_repo = SqliteTaskRepository::new(&tx);
            let task_map = insert_imported_tasks(
                &task_repo,
                &source.tasks,
                workspace_id,
                Some("(Imported)"),
                now_ms,
            )?;

            let entry_repo = SqliteTimeEntryRepository::new(&tx);
            imported_entries = insert_remapped_entries(
                &entry_repo,
                &source.time_entries,
                workspace_id,
                &task_map,
            )?;
            imported_tasks = task_map.len();
        }
        tx.commit()?;
    }

    service.load_workspace(workspace_id)?;
    info!(
        "event=import_merge module=backup status=ok workspace={workspace_id} tasks={imported_tasks} entries={imported_entries}"
    );
    Ok(())
}

/// Inserts imported tasks with fresh ids bound to the target workspace.
///
/// Timers are never resurrected from a snapshot and zero (missing) timestamps
/// default to `now`. Returns the old-id to new-id mapping.
fn insert_imported_tasks(
    repo: &SqliteTaskRepository<'_>,
    tasks: &[Task],
    workspace_uuid: WorkspaceId,
    title_suffix: Option<&str>,
    now_ms: i64,
) -> BackupResult<HashMap<TaskId, TaskId>> {
    let mut task_map = HashMap::new();
    for task in tasks {
        let mut imported = task.clone();
        imported.uuid = Uuid::new_v4();
        imported.workspace_uuid = workspace_uuid;
        imported.is_active = false;
        imported.start_time = None;
        if let Some(suffix) = title_suffix {
            imported.title = format!("{} {suffix}", imported.title);
        }
        if imported.created_at == 0 {
            imported.created_at = now_ms;
        }
        if imported.updated_at == 0 {
            imported.updated_at = now_ms;
        }

        repo.insert_task(&imported)?;
        task_map.insert(task.uuid, imported.uuid);
    }
    Ok(task_map)
}

/// Inserts entries whose task id remaps, with fresh ids; returns the count.
fn insert_remapped_entries(
    repo: &SqliteTimeEntryRepository<'_>,
    entries: &[TimeEntry],
    workspace_uuid: WorkspaceId,
    task_map: &HashMap<TaskId, TaskId>,
) -> BackupResult<usize> {
    let mut inserted = 0;
    for entry in entries {
        let Some(new_task) = task_map.get(&entry.task_uuid) else {
            continue;
        };
        let mut imported = entry.clone();
        imported.uuid = Uuid::new_v4();
        imported.workspace_uuid = workspace_uuid;
        imported.task_uuid = *new_task;

        repo.insert_entry(&imported)?;
        inserted += 1;
    }
    Ok(inserted)
}
