//! Portable export document shape and validation.
//!
//! # Responsibility
//! - Define the versioned JSON envelope wrapping a denormalized workspace.
//! - Enforce the import contract before any typed deserialization.
//!
//! # Invariants
//! - `workspace`, `version` and `workspace.name`/`ownerName`/`role` must be
//!   present and non-empty for a document to parse.
//! - File names are slugged to lowercase alphanumerics and hyphens.

use crate::backup::{BackupError, BackupResult};
use crate::model::workspace::Workspace;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Version tag written into every export envelope.
pub const EXPORT_VERSION: &str = "1.0";

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Versioned envelope around a denormalized workspace snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub workspace: Workspace,
    /// ISO-8601 export instant.
    pub exported_at: String,
    pub version: String,
}

/// Serializes a document to pretty-printed JSON.
pub fn to_json(document: &ExportDocument) -> BackupResult<String> {
    serde_json::to_string_pretty(document)
        .map_err(|err| BackupError::InvalidDocument(format!("serialization failed: {err}")))
}

/// Parses and validates an export document from JSON text.
///
/// The shape contract is checked on the raw JSON first so missing required
/// fields surface as import contract errors rather than opaque decode errors.
pub fn parse_document(json: &str) -> BackupResult<ExportDocument> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|err| BackupError::InvalidDocument(format!("not valid JSON: {err}")))?;

    let version = value
        .get("version")
        .and_then(|field| field.as_str())
        .ok_or_else(|| BackupError::InvalidDocument("missing `version`".to_string()))?;
    if version != EXPORT_VERSION {
        return Err(BackupError::UnsupportedVersion(version.to_string()));
    }

    let workspace = value
        .get("workspace")
        .filter(|field| field.is_object())
        .ok_or_else(|| BackupError::InvalidDocument("missing `workspace`".to_string()))?;

    for field in ["name", "ownerName", "role"] {
        let present = workspace
            .get(field)
            .and_then(|value| value.as_str())
            .is_some_and(|text| !text.trim().is_empty());
        if !present {
            return Err(BackupError::InvalidDocument(format!(
                "missing `workspace.{field}`"
            )));
        }
    }

    serde_json::from_value(value)
        .map_err(|err| BackupError::InvalidDocument(format!("malformed document: {err}")))
}

/// Builds the conventional export file name for a workspace.
///
/// Shape: `taku-workspace-<slugified-name>-<ISO-date>.json`.
pub fn export_file_name(workspace_name: &str, date: NaiveDate) -> String {
    let lowered = workspace_name.to_lowercase();
    let slug = SLUG_RE.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "workspace" } else { slug };
    format!("taku-workspace-{slug}-{date}.json")
}

#[cfg(test)]
mod tests {
    use super::export_file_name;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date")
    }

    #[test]
    fn file_name_slugs_and_dates() {
        assert_eq!(
            export_file_name("My Side Projects!", date()),
            "taku-workspace-my-side-projects-2024-03-09.json"
        );
    }

    #[test]
    fn file_name_falls_back_for_unsluggable_names() {
        assert_eq!(
            export_file_name("???", date()),
            "taku-workspace-workspace-2024-03-09.json"
        );
    }
}
