//! Reconciliation orchestrator for add / update across both backends.
//!
//! The service owns the ports and encodes the write policy: resolve
//! duplicates first, write at most once per backend, and report each
//! backend's outcome independently so one failed write never hides the
//! other backend's result.

use std::sync::Arc;

use scholarsync_domain::{
    BackendKind, EventDates, EventDetail, EventDraft, EventPatch, Result, ScholarSyncError,
};
use tracing::{info, instrument, warn};

use super::ports::{EventDirectory, EventStore, FolderMirror};
use super::report::{overall_success, AddReport, BackendOutcome, FolderOutcome, UpdateReport};
use super::resolver::resolve_duplicates;

/// Orchestrates event writes across the database, the calendar, and the
/// local folder mirror.
///
/// The calendar store is optional; when absent every calendar step is
/// reported as skipped rather than failing the whole operation.
///
/// Duplicate resolution and the subsequent writes are not transactional:
/// two concurrent adds for the same name + start date can both observe
/// "no duplicate" and both create. Single-operator usage makes that an
/// accepted limitation rather than a guarded case.
pub struct ReconcileService {
    database: Arc<dyn EventStore>,
    directory: Arc<dyn EventDirectory>,
    calendar: Option<Arc<dyn EventStore>>,
    folders: Arc<dyn FolderMirror>,
}

impl ReconcileService {
    pub fn new(
        database: Arc<dyn EventStore>,
        directory: Arc<dyn EventDirectory>,
        folders: Arc<dyn FolderMirror>,
    ) -> Self {
        Self { database, directory, calendar: None, folders }
    }

    /// Attach the calendar store. Without it the service runs database-only.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Arc<dyn EventStore>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Add one logical event, creating it in each backend that does not
    /// already hold a matching record.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add(&self, draft: EventDraft, create_folder: bool) -> Result<AddReport> {
        draft.validate()?;

        let start_date = draft.dates.start.date();
        let state = resolve_duplicates(
            self.database.as_ref(),
            self.calendar.as_deref(),
            &draft.name,
            start_date,
        )
        .await;
        info!(resolution = state.label(), "duplicate resolution complete");

        let notion = match state.database() {
            Some(existing) => BackendOutcome::already_exists(BackendKind::Notion, existing),
            None => self.create_in(BackendKind::Notion, self.database.as_ref(), &draft).await,
        };

        let google_calendar = match (state.calendar(), &self.calendar) {
            (Some(existing), _) => {
                BackendOutcome::already_exists(BackendKind::GoogleCalendar, existing)
            }
            (None, Some(calendar)) => {
                self.create_in(BackendKind::GoogleCalendar, calendar.as_ref(), &draft).await
            }
            (None, None) => BackendOutcome::not_attempted(
                BackendKind::GoogleCalendar,
                "google calendar integration is not configured",
            ),
        };

        let folder = if create_folder {
            Some(self.mirror_folder(&draft).await)
        } else {
            None
        };

        let success = overall_success(&[&notion, &google_calendar]);
        Ok(AddReport {
            success,
            resolution: state.label().to_string(),
            notion,
            google_calendar,
            folder,
        })
    }

    /// Update one event. The database record is the source of truth: its
    /// pre-update name and start date locate the calendar counterpart,
    /// and its stored date range anchors the merge of a partial date patch.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<UpdateReport> {
        if patch.is_empty() {
            return Err(ScholarSyncError::Validation(
                "update supplies no fields to change".to_string(),
            ));
        }

        // The read is causally required: the old identity and the stored
        // date range only exist in the pre-update record.
        let previous = self.directory.get(id).await?;

        let effective = Self::effective_patch(&patch, previous.dates.as_ref())?;

        let notion = match self.database.update(id, &effective).await {
            Ok(record) => BackendOutcome::updated(BackendKind::Notion, &record),
            Err(err) => {
                warn!(backend = %BackendKind::Notion, error = %err, "database update failed");
                BackendOutcome::write_failed(BackendKind::Notion, &err)
            }
        };

        // A failed database write does not block the calendar patch; only
        // the read above was required to get here.
        let google_calendar = self.patch_calendar(&previous, &effective).await;

        let success = overall_success(&[&notion, &google_calendar]);
        Ok(UpdateReport { success, notion, google_calendar })
    }

    /// Merge a partial date change against the stored range so that an
    /// omitted end keeps the event's span instead of collapsing it.
    fn effective_patch(patch: &EventPatch, stored: Option<&EventDates>) -> Result<EventPatch> {
        let mut effective = patch.clone();
        if patch.touches_dates() {
            if let Some(stored) = stored {
                let merged = stored.merged(patch.start, patch.end);
                effective.start = Some(merged.start);
                effective.end = merged.end;
            } else if effective.start.is_none() {
                return Err(ScholarSyncError::Validation(
                    "cannot set an end date on a record with no start date".to_string(),
                ));
            }
        }
        Ok(effective)
    }

    async fn create_in(
        &self,
        backend: BackendKind,
        store: &dyn EventStore,
        draft: &EventDraft,
    ) -> BackendOutcome {
        match store.create(draft).await {
            Ok(record) => {
                info!(backend = %backend, id = %record.id, "record created");
                BackendOutcome::created(backend, &record)
            }
            Err(err) => {
                warn!(backend = %backend, error = %err, "create failed");
                BackendOutcome::write_failed(backend, &err)
            }
        }
    }

    async fn patch_calendar(&self, previous: &EventDetail, patch: &EventPatch) -> BackendOutcome {
        let Some(calendar) = &self.calendar else {
            return BackendOutcome::not_attempted(
                BackendKind::GoogleCalendar,
                "google calendar integration is not configured",
            );
        };

        let old_identity = previous
            .dates
            .map(|dates| dates.start.date())
            .filter(|_| !previous.name.trim().is_empty());
        let Some(old_start) = old_identity else {
            return BackendOutcome::not_attempted(
                BackendKind::GoogleCalendar,
                "previous name/start date could not be recovered; calendar left untouched",
            );
        };

        match calendar.find(&previous.name, old_start).await {
            Ok(Some(existing)) => match calendar.update(&existing.id, patch).await {
                Ok(record) => BackendOutcome::updated(BackendKind::GoogleCalendar, &record),
                Err(err) => {
                    warn!(error = %err, "calendar update failed");
                    BackendOutcome::write_failed(BackendKind::GoogleCalendar, &err)
                }
            },
            Ok(None) => BackendOutcome::not_attempted(
                BackendKind::GoogleCalendar,
                "no calendar record matched the previous identity",
            ),
            Err(err) => {
                warn!(error = %err, "calendar lookup failed");
                BackendOutcome::write_failed(BackendKind::GoogleCalendar, &err)
            }
        }
    }

    async fn mirror_folder(&self, draft: &EventDraft) -> FolderOutcome {
        let date = draft.dates.start.date().format("%Y-%m-%d").to_string();
        match self.folders.ensure(&draft.name, &date).await {
            Ok(receipt) => FolderOutcome::from_receipt(receipt),
            Err(err) => {
                warn!(error = %err, "folder mirror failed");
                FolderOutcome::from_error(&err)
            }
        }
    }
}
