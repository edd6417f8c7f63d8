//! Workspace repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist workspace scalar rows (collections live in their own tables).
//! - Keep enum <-> db string mapping and JSON column codecs here.
//!
//! # Invariants
//! - Loaded workspaces come back with empty `tasks`/`time_entries`; the
//!   service assembles the denormalized mirror.
//! - Field updates touch exactly one column per call.

use crate::model::workspace::{Role, Settings, Theme, Workspace, WorkspaceId};
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const WORKSPACE_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    owner_name,
    role,
    created_at,
    columns,
    weekly_goals,
    theme,
    settings
FROM workspaces";

/// Repository interface for workspace rows.
pub trait WorkspaceRepository {
    fn insert_workspace(&self, workspace: &Workspace) -> RepoResult<WorkspaceId>;
    fn get_workspace(&self, id: WorkspaceId) -> RepoResult<Option<Workspace>>;
    fn update_columns(&self, id: WorkspaceId, columns: &[String]) -> RepoResult<()>;
    fn update_weekly_goals(&self, id: WorkspaceId, weekly_goals: u32) -> RepoResult<()>;
    fn update_settings(&self, id: WorkspaceId, settings: &Settings) -> RepoResult<()>;
    fn update_theme(&self, id: WorkspaceId, theme: Theme) -> RepoResult<()>;
}

/// SQLite-backed workspace repository.
pub struct SqliteWorkspaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkspaceRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn update_field(
        &self,
        id: WorkspaceId,
        sql: &str,
        value: impl rusqlite::ToSql,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(sql, params![value, id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::WorkspaceNotFound(id));
        }
        Ok(())
    }
}

impl WorkspaceRepository for SqliteWorkspaceRepository<'_> {
    fn insert_workspace(&self, workspace: &Workspace) -> RepoResult<WorkspaceId> {
        workspace.validate()?;

        self.conn.execute(
            "INSERT INTO workspaces (
                uuid,
                name,
                owner_name,
                role,
                created_at,
                columns,
                weekly_goals,
                theme,
                settings
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                workspace.uuid.to_string(),
                workspace.name.as_str(),
                workspace.owner_name.as_str(),
                role_to_db(workspace.role),
                workspace.created_at,
                serde_json::to_string(&workspace.columns)?,
                workspace.weekly_goals,
                theme_to_db(workspace.theme),
                serde_json::to_string(&workspace.settings)?,
            ],
        )?;

        Ok(workspace.uuid)
    }

    fn get_workspace(&self, id: WorkspaceId) -> RepoResult<Option<Workspace>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKSPACE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_workspace_row(row)?));
        }

        Ok(None)
    }

    fn update_columns(&self, id: WorkspaceId, columns: &[String]) -> RepoResult<()> {
        self.update_field(
            id,
            "UPDATE workspaces SET columns = ?1 WHERE uuid = ?2;",
            serde_json::to_string(columns)?,
        )
    }

    fn update_weekly_goals(&self, id: WorkspaceId, weekly_goals: u32) -> RepoResult<()> {
        self.update_field(
            id,
            "UPDATE workspaces SET weekly_goals = ?1 WHERE uuid = ?2;",
            weekly_goals,
        )
    }

    fn update_settings(&self, id: WorkspaceId, settings: &Settings) -> RepoResult<()> {
        self.update_field(
            id,
            "UPDATE workspaces SET settings = ?1 WHERE uuid = ?2;",
            serde_json::to_string(settings)?,
        )
    }

    fn update_theme(&self, id: WorkspaceId, theme: Theme) -> RepoResult<()> {
        self.update_field(
            id,
            "UPDATE workspaces SET theme = ?1 WHERE uuid = ?2;",
            theme_to_db(theme),
        )
    }
}

fn parse_workspace_row(row: &Row<'_>) -> RepoResult<Workspace> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "workspaces.uuid")?;

    let role_text: String = row.get("role")?;
    let role = parse_role(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid role `{role_text}` in workspaces.role"))
    })?;

    let theme_text: String = row.get("theme")?;
    let theme = parse_theme(&theme_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid theme `{theme_text}` in workspaces.theme"))
    })?;

    let columns_json: String = row.get("columns")?;
    let columns: Vec<String> = serde_json::from_str(&columns_json)?;

    let settings_json: String = row.get("settings")?;
    let settings: Settings = serde_json::from_str(&settings_json)?;

    Ok(Workspace {
        uuid,
        name: row.get("name")?,
        owner_name: row.get("owner_name")?,
        role,
        created_at: row.get("created_at")?,
        columns,
        weekly_goals: row.get("weekly_goals")?,
        theme,
        settings,
        tasks: Vec::new(),
        time_entries: Vec::new(),
    })
}

fn role_to_db(role: Role) -> &'static str {
    match role {
        Role::Student => "student",
        Role::Developer => "developer",
        Role::Designer => "designer",
        Role::Other => "other",
    }
}

fn parse_role(value: &str) -> Option<Role> {
    match value {
        "student" => Some(Role::Student),
        "developer" => Some(Role::Developer),
        "designer" => Some(Role::Designer),
        "other" => Some(Role::Other),
        _ => None,
    }
}

fn theme_to_db(theme: Theme) -> &'static str {
    match theme {
        Theme::System => "system",
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

fn parse_theme(value: &str) -> Option<Theme> {
    match value {
        "system" => Some(Theme::System),
        "light" => Some(Theme::Light),
        "dark" => Some(Theme::Dark),
        _ => None,
    }
}
