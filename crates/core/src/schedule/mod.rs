//! Schedule reconciliation: ports, duplicate resolution, orchestration.

pub mod ports;
pub mod report;
pub mod resolver;
pub mod service;
