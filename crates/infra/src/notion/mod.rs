//! Notion adapters: the versioned HTTP client, property codecs, and the
//! schedule/literature port implementations.

mod client;
mod paper_index;
mod props;
mod schedule_store;

pub use client::NotionClient;
pub use paper_index::NotionPaperIndex;
pub use schedule_store::NotionScheduleStore;
