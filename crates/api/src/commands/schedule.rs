//! Schedule commands: list, search, get, add, update and folder creation.
//!
//! Date and date-time arguments arrive as strings and are parsed here, in the
//! configured timezone, before anything reaches the reconcile service.

use chrono_tz::Tz;
use scholarsync_core::{AddReport, FolderReceipt, UpdateReport};
use scholarsync_domain::{
    parse_date, parse_event_datetime, EventDates, EventDetail, EventDraft, EventPatch,
    EventSummary, ListFilter, Result, ScholarSyncError,
};
use serde::Serialize;
use tracing::info;

use crate::AppContext;

/// Raw event fields as typed on the command line.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub name: String,
    pub start: String,
    pub end: Option<String>,
    pub place: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub abstract_deadline: Option<String>,
}

/// Raw patch fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct PatchInput {
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub place: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub abstract_deadline: Option<String>,
}

/// Folder result in the wire shape the CLI prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderCreated {
    pub path: String,
    pub existed: bool,
}

impl From<FolderReceipt> for FolderCreated {
    fn from(receipt: FolderReceipt) -> Self {
        Self {
            path: receipt.path.display().to_string(),
            existed: receipt.existed,
        }
    }
}

pub async fn list(ctx: &AppContext, filter: ListFilter) -> Result<Vec<EventSummary>> {
    let events = ctx.directory.list(&filter).await?;
    info!(count = events.len(), "listed schedule records");
    Ok(events)
}

pub async fn search(ctx: &AppContext, query: &str, limit: Option<u32>) -> Result<Vec<EventSummary>> {
    let events = ctx.directory.search(query, limit).await?;
    info!(query, count = events.len(), "searched schedule records");
    Ok(events)
}

pub async fn get(ctx: &AppContext, id: &str) -> Result<EventDetail> {
    ctx.directory.get(id).await
}

pub async fn add(ctx: &AppContext, input: EventInput, create_folder: bool) -> Result<AddReport> {
    let draft = draft_from_input(input, ctx.config.tz()?)?;
    info!(name = %draft.name, create_folder, "adding event");
    ctx.reconciler.add(draft, create_folder).await
}

pub async fn update(ctx: &AppContext, id: &str, input: PatchInput) -> Result<UpdateReport> {
    let patch = patch_from_input(input, ctx.config.tz()?)?;
    info!(id, "updating event");
    ctx.reconciler.update(id, patch).await
}

pub async fn create_folder(ctx: &AppContext, name: &str, date: &str) -> Result<FolderCreated> {
    let receipt = ctx.folders.ensure(name, date).await?;
    Ok(FolderCreated::from(receipt))
}

/// Builds a [`ListFilter`] from raw CLI arguments, parsing the date bounds.
pub fn filter_from_args(
    status: Option<String>,
    category: Option<String>,
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<u32>,
) -> Result<ListFilter> {
    Ok(ListFilter {
        status,
        category,
        date_from: from.map(parse_date).transpose()?,
        date_to: to.map(parse_date).transpose()?,
        limit,
    })
}

pub fn draft_from_input(input: EventInput, tz: Tz) -> Result<EventDraft> {
    if input.name.trim().is_empty() {
        return Err(ScholarSyncError::Validation(
            "event name must not be empty".to_string(),
        ));
    }
    let start = parse_event_datetime(&input.start, tz)?;
    let end = input
        .end
        .as_deref()
        .map(|raw| parse_event_datetime(raw, tz))
        .transpose()?;

    let mut draft = EventDraft::new(input.name, EventDates::new(start, end));
    draft.place = input.place;
    draft.notes = input.notes;
    draft.category = input.category;
    draft.tags = input.tags;
    draft.status = input.status;
    draft.link = input.link;
    draft.abstract_deadline = input.abstract_deadline.as_deref().map(parse_date).transpose()?;
    Ok(draft)
}

pub fn patch_from_input(input: PatchInput, tz: Tz) -> Result<EventPatch> {
    Ok(EventPatch {
        name: input.name,
        start: input
            .start
            .as_deref()
            .map(|raw| parse_event_datetime(raw, tz))
            .transpose()?,
        end: input
            .end
            .as_deref()
            .map(|raw| parse_event_datetime(raw, tz))
            .transpose()?,
        place: input.place,
        notes: input.notes,
        category: input.category,
        tags: input.tags,
        status: input.status,
        link: input.link,
        abstract_deadline: input
            .abstract_deadline
            .as_deref()
            .map(parse_date)
            .transpose()?,
    })
}
