//! Port interfaces for schedule reconciliation
//!
//! These traits define the boundaries between core business logic
//! and the backend adapters.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;
use scholarsync_domain::{
    EventDetail, EventDraft, EventPatch, EventSummary, ListFilter, Result, StoreRecord,
};

/// One record store, implemented once per backend.
///
/// Every call is a single network round trip against the live backend; no
/// caching, no batching.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Search by semantic identity (name + start date).
    ///
    /// Runs the backend-native fuzzy search, then post-filters to a
    /// case-insensitive full-string name match. At most one record is
    /// returned; the first exact match wins.
    async fn find(&self, name: &str, start_date: NaiveDate) -> Result<Option<StoreRecord>>;

    /// Create a record for the draft.
    async fn create(&self, draft: &EventDraft) -> Result<StoreRecord>;

    /// Patch the record behind `id`. Fields absent from the patch keep
    /// their stored values.
    async fn update(&self, id: &str, patch: &EventPatch) -> Result<StoreRecord>;
}

/// Read operations only the database backend offers.
#[async_trait]
pub trait EventDirectory: Send + Sync {
    /// Filtered listing, most recent event date first.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<EventSummary>>;

    /// Name-substring search, case sensitivity per the backend default.
    async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<EventSummary>>;

    /// Full record detail including the raw property map.
    async fn get(&self, id: &str) -> Result<EventDetail>;
}

/// Result of one idempotent folder creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderReceipt {
    pub path: PathBuf,
    pub existed: bool,
}

/// Local filesystem mirror keyed by the same semantic identity.
#[async_trait]
pub trait FolderMirror: Send + Sync {
    /// Ensure `{base}/{year}/{date} {sanitized name}` exists.
    ///
    /// `date` must be a strict `YYYY-MM-DD` string. Creating an existing
    /// folder succeeds with `existed: true`, never an error.
    async fn ensure(&self, name: &str, date: &str) -> Result<FolderReceipt>;
}
