//! # scholarsync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Notion adapters (schedule store, directory, literature index)
//! - Google Calendar adapter with refresh-token auth
//! - Local filesystem folder mirror
//! - HTTP client with retry and the configuration loader
//!
//! ## Architecture
//! - Implements traits defined in `scholarsync-core`
//! - Depends on `scholarsync-domain` and `scholarsync-core`
//! - Contains all "impure" code (network, filesystem, env)

pub mod config;
pub mod errors;
pub mod folders;
pub mod gcal;
pub mod http;
pub mod notion;

// Re-export commonly used items
pub use config::load_config;
pub use errors::InfraError;
pub use folders::LocalFolderMirror;
pub use gcal::{GoogleCalendarStore, GoogleTokenProvider};
pub use http::HttpClient;
pub use notion::{NotionClient, NotionPaperIndex, NotionScheduleStore};
