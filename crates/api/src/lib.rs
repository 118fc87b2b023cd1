//! # scholarsync application
//!
//! Wires configuration, the Notion and Google Calendar adapters and the
//! reconcile and paper-push services into the command-line surface.

pub mod commands;
pub mod context;

pub use context::AppContext;
