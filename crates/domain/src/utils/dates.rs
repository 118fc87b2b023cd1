//! Date/time parsing shared by the boundary layer and both store adapters.
//!
//! Timestamps that arrive without a UTC offset are interpreted in the
//! configured default timezone, never silently as UTC — misreading a bare
//! local time as UTC is the failure mode this module exists to prevent.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::errors::{Result, ScholarSyncError};
use crate::types::EventDateTime;

/// Accepted layouts for timestamps lacking an offset.
const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ScholarSyncError::Validation(format!("invalid date '{raw}', expected YYYY-MM-DD"))
    })
}

/// Parse one event boundary.
///
/// `YYYY-MM-DD` becomes an all-day bound; an RFC 3339 timestamp keeps the
/// offset it carries; a bare `YYYY-MM-DDTHH:MM[:SS]` is placed in
/// `default_tz`.
pub fn parse_event_datetime(raw: &str, default_tz: Tz) -> Result<EventDateTime> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(EventDateTime::AllDay(date));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(EventDateTime::Timed(ts));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return localize(naive, default_tz);
        }
    }
    Err(ScholarSyncError::Validation(format!(
        "unrecognized date/time '{trimmed}' (expected YYYY-MM-DD or an ISO timestamp)"
    )))
}

/// Pad a partial publication date (`YYYY` or `YYYY-MM`) to a full date the
/// database accepts.
pub fn pad_publication_date(raw: &str) -> String {
    match raw.len() {
        4 => format!("{raw}-01-01"),
        7 => format!("{raw}-01"),
        _ => raw.to_string(),
    }
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Result<EventDateTime> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|ts| EventDateTime::Timed(ts.fixed_offset()))
        .ok_or_else(|| {
            ScholarSyncError::Validation(format!("time {naive} does not exist in {tz}"))
        })
}

#[cfg(test)]
mod tests {
    use chrono_tz::Asia::Seoul;

    use super::*;

    #[test]
    fn bare_date_parses_as_all_day() {
        let parsed = parse_event_datetime("2026-03-10", Seoul).unwrap();
        assert!(!parsed.is_timed());
        assert_eq!(parsed.to_string(), "2026-03-10");
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let parsed = parse_event_datetime("2026-03-10T09:00:00-05:00", Seoul).unwrap();
        assert_eq!(parsed.to_string(), "2026-03-10T09:00:00-05:00");
    }

    #[test]
    fn bare_timestamp_gets_the_default_zone() {
        let parsed = parse_event_datetime("2026-03-10T09:00", Seoul).unwrap();
        assert_eq!(parsed.to_string(), "2026-03-10T09:00:00+09:00");
    }

    #[test]
    fn bare_timestamp_with_seconds_and_space() {
        let parsed = parse_event_datetime("2026-03-10 09:00:30", Seoul).unwrap();
        assert_eq!(parsed.to_string(), "2026-03-10T09:00:30+09:00");
    }

    #[test]
    fn bare_timestamp_is_not_read_as_utc() {
        let parsed = parse_event_datetime("2026-03-10T09:00", Seoul).unwrap();
        match parsed {
            EventDateTime::Timed(ts) => {
                assert_eq!(ts.with_timezone(&chrono::Utc).to_rfc3339(), "2026-03-10T00:00:00+00:00");
            }
            EventDateTime::AllDay(_) => panic!("expected a timed bound"),
        }
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let err = parse_event_datetime("next tuesday", Seoul).unwrap_err();
        assert!(matches!(err, ScholarSyncError::Validation(_)));
    }

    #[test]
    fn strict_date_rejects_datetime_input() {
        assert!(parse_date("2026-03-10T09:00").is_err());
        assert!(parse_date("2026-03-10").is_ok());
    }

    #[test]
    fn publication_date_padding() {
        assert_eq!(pad_publication_date("2026"), "2026-01-01");
        assert_eq!(pad_publication_date("2026-03"), "2026-03-01");
        assert_eq!(pad_publication_date("2026-03-15"), "2026-03-15");
    }
}
