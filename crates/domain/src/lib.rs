//! # scholarsync Domain
//!
//! Business domain types and models for scholarsync.
//!
//! This crate contains:
//! - Schedule and literature record types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Date/time and text utilities shared by the adapters
//!
//! ## Architecture
//! - No dependencies on other scholarsync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export date/text utilities used at the boundary
pub use utils::dates::{parse_date, parse_event_datetime};
pub use utils::text::{chunk_text, truncate_chars};
