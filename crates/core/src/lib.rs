//! # scholarsync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for both record stores, the folder
//!   mirror and the literature database
//! - The duplicate resolver and reconciliation orchestrator
//! - Literature classification rules and the push service
//!
//! ## Architecture Principles
//! - Only depends on `scholarsync-domain`
//! - No HTTP, filesystem, or credential code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod papers;
pub mod schedule;

// Re-export specific items to avoid ambiguity
pub use papers::classify::{classify_categories, classify_interest, classify_publication_type};
pub use papers::ports::{ExistingKeys, PaperIndex, PaperMeta};
pub use papers::service::{PaperPushReport, PaperPushService};
pub use schedule::ports::{EventDirectory, EventStore, FolderMirror, FolderReceipt};
pub use schedule::report::{AddReport, BackendOutcome, FolderOutcome, UpdateReport, WriteAction};
pub use schedule::resolver::{resolve_duplicates, DuplicateState};
pub use schedule::service::ReconcileService;
