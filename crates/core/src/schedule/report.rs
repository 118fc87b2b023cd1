//! Aggregate result shapes returned by the boundary operations.
//!
//! Expected failure modes (duplicate found, backend unreachable) are data,
//! not errors: each backend gets its own sub-result and the overall flag is
//! true unless every attempted write failed.

use std::path::PathBuf;

use scholarsync_domain::{BackendKind, ScholarSyncError, StoreRecord};
use serde::{Deserialize, Serialize};

use super::ports::FolderReceipt;

/// What the orchestrator did (or declined to do) in one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteAction {
    Created,
    Updated,
    Skipped,
    Failed,
}

/// Per-backend sub-result. `success` is true only when the backend holds
/// the intended record afterwards (created, updated, or already present).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendOutcome {
    pub backend: BackendKind,
    pub success: bool,
    pub action: WriteAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendOutcome {
    pub fn created(backend: BackendKind, record: &StoreRecord) -> Self {
        Self {
            backend,
            success: true,
            action: WriteAction::Created,
            id: Some(record.id.clone()),
            url: record.url.clone(),
            note: None,
            error: None,
        }
    }

    pub fn updated(backend: BackendKind, record: &StoreRecord) -> Self {
        Self {
            backend,
            success: true,
            action: WriteAction::Updated,
            id: Some(record.id.clone()),
            url: record.url.clone(),
            note: None,
            error: None,
        }
    }

    /// The record already exists; nothing was written. Carries the
    /// existing id/url so callers can link to it.
    pub fn already_exists(backend: BackendKind, record: &StoreRecord) -> Self {
        Self {
            backend,
            success: true,
            action: WriteAction::Skipped,
            id: Some(record.id.clone()),
            url: record.url.clone(),
            note: Some("skipped — already exists".to_string()),
            error: None,
        }
    }

    /// The step was not attempted (integration disabled, identity
    /// unrecoverable). Does not count as an attempted write.
    pub fn not_attempted(backend: BackendKind, reason: impl Into<String>) -> Self {
        Self {
            backend,
            success: false,
            action: WriteAction::Skipped,
            id: None,
            url: None,
            note: Some(reason.into()),
            error: None,
        }
    }

    /// An attempted write failed; the originating backend's message is
    /// carried verbatim.
    pub fn write_failed(backend: BackendKind, err: &ScholarSyncError) -> Self {
        Self {
            backend,
            success: false,
            action: WriteAction::Failed,
            id: None,
            url: None,
            note: None,
            error: Some(err.to_string()),
        }
    }

    /// Whether this outcome represents a write the orchestrator tried to
    /// perform (as opposed to a skip).
    pub fn attempted(&self) -> bool {
        self.action != WriteAction::Skipped
    }
}

/// Overall flag: true unless every attempted write failed. Pure skips
/// (already exists, integration disabled) keep it true.
pub(crate) fn overall_success(outcomes: &[&BackendOutcome]) -> bool {
    let mut any_attempted = false;
    for outcome in outcomes {
        if outcome.attempted() {
            if outcome.success {
                return true;
            }
            any_attempted = true;
        }
    }
    !any_attempted
}

/// Folder mirror sub-result for `add(create_folder: true)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FolderOutcome {
    pub fn from_receipt(receipt: FolderReceipt) -> Self {
        Self { success: true, path: Some(receipt.path), existed: Some(receipt.existed), error: None }
    }

    pub fn from_error(err: &ScholarSyncError) -> Self {
        Self { success: false, path: None, existed: None, error: Some(err.to_string()) }
    }
}

/// Aggregate response of the create path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReport {
    pub success: bool,
    /// Resolver classification: `no_duplicate`, `database_only`,
    /// `calendar_only` or `fully_duplicate`.
    pub resolution: String,
    pub notion: BackendOutcome,
    pub google_calendar: BackendOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderOutcome>,
}

/// Aggregate response of the update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReport {
    pub success: bool,
    pub notion: BackendOutcome,
    pub google_calendar: BackendOutcome,
}
