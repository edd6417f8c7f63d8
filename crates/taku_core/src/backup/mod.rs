//! Workspace backup and transfer.
//!
//! # Responsibility
//! - Serialize a workspace to a portable JSON document and reconstruct or
//!   merge a workspace from such a document.
//! - Re-key every imported identifier so snapshots never collide with live
//!   rows.
//!
//! # Invariants
//! - Imported tasks never resurrect a running timer (`is_active` forced off).
//! - Time entries are imported only when their task id was remapped.
//! - Import bulk writes happen inside one transaction per document.

use crate::db::DbError;
use crate::repo::RepoError;
use crate::service::workspace_service::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod document;
mod transfer;

pub use document::{export_file_name, parse_document, to_json, ExportDocument, EXPORT_VERSION};
pub use transfer::{
    export_workspace, import_merge, import_merge_at, import_overwrite, import_overwrite_at,
    last_export_at,
};

pub type BackupResult<T> = Result<T, BackupError>;

/// Errors from export/import use-cases.
#[derive(Debug)]
pub enum BackupError {
    /// Document shape failed the import contract.
    InvalidDocument(String),
    /// Document version tag is not understood by this binary.
    UnsupportedVersion(String),
    /// The operation requires a loaded workspace.
    NoActiveWorkspace,
    /// Workspace service failure during create/load.
    Store(StoreError),
    /// Persistence failure during bulk writes.
    Repo(RepoError),
    /// SQLite transaction failure.
    Db(DbError),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDocument(message) => write!(f, "invalid backup document: {message}"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported backup version `{version}`")
            }
            Self::NoActiveWorkspace => write!(f, "no workspace is loaded"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for BackupError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for BackupError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
