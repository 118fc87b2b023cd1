//! Shared HTTP plumbing for the backend adapters.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
