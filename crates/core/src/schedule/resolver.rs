//! Duplicate resolution across both record stores.
//!
//! Cross-backend identity is derived (name + start date), so "does this
//! event already exist?" is answered by searching both backends and merging
//! the answers into one of four states. A failed probe degrades that
//! backend's answer to "absent" instead of failing the resolution — partial
//! visibility is the expected steady state here.

use chrono::NaiveDate;
use scholarsync_domain::{BackendKind, StoreRecord};
use tracing::warn;

use super::ports::EventStore;

/// Combined existence state of one logical event across both backends.
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateState {
    /// Records exist in both backends; nothing to create.
    Both { database: StoreRecord, calendar: StoreRecord },
    /// Only the database has a record; the calendar is missing one.
    DatabaseOnly { database: StoreRecord },
    /// Only the calendar has a record; the database is missing one.
    CalendarOnly { calendar: StoreRecord },
    /// Neither backend has a record.
    Neither,
}

impl DuplicateState {
    /// Build the state from the two probe answers. Total over all four
    /// combinations by construction.
    pub fn classify(database: Option<StoreRecord>, calendar: Option<StoreRecord>) -> Self {
        match (database, calendar) {
            (Some(database), Some(calendar)) => Self::Both { database, calendar },
            (Some(database), None) => Self::DatabaseOnly { database },
            (None, Some(calendar)) => Self::CalendarOnly { calendar },
            (None, None) => Self::Neither,
        }
    }

    /// Wire label used in reports.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Both { .. } => "fully_duplicate",
            Self::DatabaseOnly { .. } => "database_only",
            Self::CalendarOnly { .. } => "calendar_only",
            Self::Neither => "no_duplicate",
        }
    }

    pub const fn is_fully_duplicate(&self) -> bool {
        matches!(self, Self::Both { .. })
    }

    /// Existing database record, if the database matched.
    pub const fn database(&self) -> Option<&StoreRecord> {
        match self {
            Self::Both { database, .. } | Self::DatabaseOnly { database } => Some(database),
            _ => None,
        }
    }

    /// Existing calendar record, if the calendar matched.
    pub const fn calendar(&self) -> Option<&StoreRecord> {
        match self {
            Self::Both { calendar, .. } | Self::CalendarOnly { calendar } => Some(calendar),
            _ => None,
        }
    }
}

/// Probe both stores concurrently and classify the combined state.
///
/// The two finds are independent reads, so they are issued together; an
/// absent calendar store (integration disabled) probes as "no match".
pub async fn resolve_duplicates(
    database: &dyn EventStore,
    calendar: Option<&dyn EventStore>,
    name: &str,
    start_date: NaiveDate,
) -> DuplicateState {
    let database_probe = probe(BackendKind::Notion, database, name, start_date);
    let calendar_probe = async {
        match calendar {
            Some(store) => probe(BackendKind::GoogleCalendar, store, name, start_date).await,
            None => None,
        }
    };

    let (database_match, calendar_match) = tokio::join!(database_probe, calendar_probe);
    DuplicateState::classify(database_match, calendar_match)
}

async fn probe(
    backend: BackendKind,
    store: &dyn EventStore,
    name: &str,
    start_date: NaiveDate,
) -> Option<StoreRecord> {
    match store.find(name, start_date).await {
        Ok(found) => found,
        Err(err) => {
            warn!(backend = %backend, error = %err, "duplicate probe failed; treating backend as having no match");
            None
        }
    }
}
