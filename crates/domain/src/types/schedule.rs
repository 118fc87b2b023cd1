//! Schedule record types shared by the reconciler and both store adapters.
//!
//! An event's cross-backend identity is derived (name + start date), never a
//! shared primary key: each backend assigns its own opaque id, so duplicate
//! detection is a search, not a lookup.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which external record store a result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Notion,
    GoogleCalendar,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notion => "notion",
            Self::GoogleCalendar => "google_calendar",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boundary of an event: a whole day or an exact clock time.
///
/// An event is "timed" iff its start bound carries a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDateTime {
    AllDay(NaiveDate),
    Timed(DateTime<FixedOffset>),
}

impl EventDateTime {
    pub const fn is_timed(&self) -> bool {
        matches!(self, Self::Timed(_))
    }

    /// Calendar date of this boundary (offset-local for timed values).
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::AllDay(date) => *date,
            Self::Timed(ts) => ts.date_naive(),
        }
    }
}

impl std::fmt::Display for EventDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Timed(ts) => f.write_str(&ts.to_rfc3339()),
        }
    }
}

/// Start/end pair for one logical event. `end` may be absent; `end` present
/// without `start` is unrepresentable by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDates {
    pub start: EventDateTime,
    pub end: Option<EventDateTime>,
}

impl EventDates {
    pub const fn new(start: EventDateTime, end: Option<EventDateTime>) -> Self {
        Self { start, end }
    }

    pub fn all_day(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { start: EventDateTime::AllDay(start), end: end.map(EventDateTime::AllDay) }
    }

    pub const fn is_timed(&self) -> bool {
        self.start.is_timed()
    }

    /// Whole days between start and end; 0 for single-day or open-ended.
    pub fn span_days(&self) -> i64 {
        self.end.map_or(0, |end| (end.date() - self.start.date()).num_days())
    }

    /// Merge patched bounds over the stored ones.
    ///
    /// A new start without an explicit end keeps the stored span: the end
    /// moves with the start instead of collapsing a multi-day event.
    pub fn merged(&self, new_start: Option<EventDateTime>, new_end: Option<EventDateTime>) -> Self {
        match (new_start, new_end) {
            (None, None) => *self,
            (None, Some(end)) => Self { start: self.start, end: Some(end) },
            (Some(start), Some(end)) => Self { start, end: Some(end) },
            (Some(start), None) => Self { start, end: self.shifted_end(start) },
        }
    }

    fn shifted_end(&self, new_start: EventDateTime) -> Option<EventDateTime> {
        let old_end = self.end?;
        let end = match (self.start, old_end, new_start) {
            (
                EventDateTime::Timed(old_start),
                EventDateTime::Timed(old_end_ts),
                EventDateTime::Timed(start),
            ) => EventDateTime::Timed(start + (old_end_ts - old_start)),
            _ => {
                // Mixed or all-day bounds shift at day precision.
                let span = (old_end.date() - self.start.date()).num_days();
                match new_start {
                    EventDateTime::AllDay(date) => EventDateTime::AllDay(date + Duration::days(span)),
                    EventDateTime::Timed(ts) => EventDateTime::Timed(ts + Duration::days(span)),
                }
            }
        };
        Some(end)
    }
}

/// Draft of a logical event: the argument to one create call. Exists only
/// transiently; persistent state lives in the backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    pub dates: EventDates,
    pub place: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub abstract_deadline: Option<NaiveDate>,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, dates: EventDates) -> Self {
        Self {
            name: name.into(),
            dates,
            place: None,
            notes: None,
            category: None,
            tags: Vec::new(),
            status: None,
            link: None,
            abstract_deadline: None,
        }
    }

    /// Required-field check shared by both store adapters.
    pub fn validate(&self) -> crate::errors::Result<()> {
        if self.name.trim().is_empty() {
            return Err(crate::errors::ScholarSyncError::Validation(
                "event name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial update: `None` fields leave the stored values untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventPatch {
    pub name: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    pub place: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub abstract_deadline: Option<NaiveDate>,
}

impl EventPatch {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.place.is_none()
            && self.notes.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.status.is_none()
            && self.link.is_none()
            && self.abstract_deadline.is_none()
    }

    /// True when the patch touches the date range at all.
    pub const fn touches_dates(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Normalized view of one backend's stored record. Owned exclusively by its
/// backend and re-queried on every operation, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    pub url: Option<String>,
    pub last_edited: Option<DateTime<Utc>>,
    pub name: String,
    pub dates: EventDates,
    pub place: Option<String>,
    pub notes: Option<String>,
}

/// Summary row returned by list/search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub dates: Option<EventDates>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub place: Option<String>,
    pub url: Option<String>,
}

/// Full record detail, raw backend property map included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetail {
    pub id: String,
    pub name: String,
    pub dates: Option<EventDates>,
    pub place: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<String>,
    pub link: Option<String>,
    pub abstract_deadline: Option<NaiveDate>,
    pub url: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub last_edited: Option<DateTime<Utc>>,
    pub properties: serde_json::Value,
}

/// Filters accepted by the list operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<u32>,
}
