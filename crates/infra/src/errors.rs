//! Conversions from external infrastructure errors into domain errors.

use reqwest::StatusCode;
use scholarsync_domain::{truncate_chars, ScholarSyncError};

/// Longest error-body snippet carried into a domain error message.
const ERROR_BODY_SNIPPET_CHARS: usize = 200;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ScholarSyncError);

impl From<InfraError> for ScholarSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ScholarSyncError> for InfraError {
    fn from(value: ScholarSyncError) -> Self {
        Self(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ScholarSyncError */
/* -------------------------------------------------------------------------- */

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self(ScholarSyncError::Backend("HTTP request timed out".into()));
        }
        if err.is_connect() {
            return Self(ScholarSyncError::Backend("HTTP connection failure".into()));
        }
        if let Some(status) = err.status() {
            return Self(classify_status(
                status,
                format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("")),
            ));
        }
        Self(ScholarSyncError::Backend(err.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ScholarSyncError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(err: serde_json::Error) -> Self {
        Self(ScholarSyncError::Internal(format!("failed to decode response body: {err}")))
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ScholarSyncError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(err: std::io::Error) -> Self {
        Self(ScholarSyncError::Internal(format!("filesystem error: {err}")))
    }
}

/// Map a non-success response to the domain taxonomy, carrying the
/// originating service's error body verbatim (truncated).
pub(crate) fn status_error(service: &str, status: StatusCode, body: &str) -> ScholarSyncError {
    let snippet = truncate_chars(body.trim(), ERROR_BODY_SNIPPET_CHARS);
    let message = format!("{service} API error ({status}): {snippet}");
    classify_status(status, message)
}

fn classify_status(status: StatusCode, message: String) -> ScholarSyncError {
    match status.as_u16() {
        401 | 403 => ScholarSyncError::Backend(message),
        404 => ScholarSyncError::NotFound(message),
        429 => ScholarSyncError::Backend(message),
        400..=499 => ScholarSyncError::Validation(message),
        _ => ScholarSyncError::Backend(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
