//! Literature pipeline: classification rules and the dedup-guarded push.

pub mod classify;
pub mod ports;
pub mod service;
