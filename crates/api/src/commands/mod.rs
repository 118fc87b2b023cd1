//! Command layer bridging the CLI surface to the services.
//!
//! Each command takes the [`AppContext`](crate::AppContext), converts raw
//! string arguments into domain types at the boundary, and returns a
//! serializable result for the binary to print.

pub mod papers;
pub mod schedule;
