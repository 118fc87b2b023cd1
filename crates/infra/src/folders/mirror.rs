//! Idempotent folder creation under a cloud-synced base directory.
//!
//! The folder tree mirrors the schedule database: one directory per event,
//! named `{date} {name}` and nested under the event's year. The directory
//! itself is the state; creating it twice reports `existed` instead of
//! failing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use scholarsync_core::{FolderMirror, FolderReceipt};
use scholarsync_domain::{Result, ScholarSyncError};

use crate::InfraError;

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("DATE_PATTERN should compile - this is a bug")
});

/// Filesystem-backed [`FolderMirror`] rooted at one base directory.
pub struct LocalFolderMirror {
    base_dir: PathBuf,
}

impl LocalFolderMirror {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn folder_path(&self, name: &str, date: NaiveDate) -> PathBuf {
        let folder = format!("{} {}", date.format("%Y-%m-%d"), sanitize_name(name));
        self.base_dir.join(date.year().to_string()).join(folder)
    }
}

#[async_trait]
impl FolderMirror for LocalFolderMirror {
    async fn ensure(&self, name: &str, date: &str) -> Result<FolderReceipt> {
        let date = parse_strict_date(date)?;
        if name.trim().is_empty() {
            return Err(ScholarSyncError::Validation(
                "folder name must not be empty".to_string(),
            ));
        }

        let path = self.folder_path(name, date);
        let existed = tokio::fs::try_exists(&path).await.unwrap_or(false);
        if !existed {
            tokio::fs::create_dir_all(&path).await.map_err(|err| InfraError::from(err).0)?;
            info!(path = %path.display(), "created conference folder");
        }

        Ok(FolderReceipt { path, existed })
    }
}

/// Strict `YYYY-MM-DD` check. Shapes like `2026-3-1` or a full timestamp
/// are rejected before touching the filesystem.
fn parse_strict_date(raw: &str) -> Result<NaiveDate> {
    if !DATE_PATTERN.is_match(raw) {
        return Err(ScholarSyncError::Validation(format!(
            "folder date must be YYYY-MM-DD, got '{raw}'"
        )));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ScholarSyncError::Validation(format!("'{raw}' is not a real calendar date")))
}

/// Path separators in an event name would nest directories; fold them into
/// a plain dash.
fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect()
}
