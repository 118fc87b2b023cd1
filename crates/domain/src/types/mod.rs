//! Domain types and models

pub mod paper;
pub mod schedule;

// Re-export record types for convenience
pub use paper::{InterestLevel, PaperRecord};
pub use schedule::{
    BackendKind, EventDateTime, EventDates, EventDetail, EventDraft, EventPatch, EventSummary,
    ListFilter, StoreRecord,
};
