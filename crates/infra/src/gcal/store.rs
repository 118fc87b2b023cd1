//! Google Calendar event store.
//!
//! Date handling differs from the database backend on purpose: the Calendar
//! API stores all-day end dates exclusively (the day after the last attended
//! day), while every type in this codebase keeps ends inclusive. The
//! conversion happens here and nowhere else.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use scholarsync_core::EventStore;
use scholarsync_domain::constants::{CALENDAR_FIND_MAX_RESULTS, DEFAULT_TIMED_EVENT_MINUTES};
use scholarsync_domain::{
    EventDateTime, EventDates, EventDraft, EventPatch, GoogleCalendarConfig, Result,
    ScholarSyncError, StoreRecord,
};

use crate::errors::status_error;
use crate::gcal::GoogleTokenProvider;
use crate::http::HttpClient;
use crate::InfraError;

/// Calendar-backed [`EventStore`] over the Calendar v3 REST API.
pub struct GoogleCalendarStore {
    http: HttpClient,
    auth: Arc<GoogleTokenProvider>,
    base_url: String,
    calendar_id: String,
}

#[derive(Debug, Deserialize)]
struct EventListing {
    #[serde(default)]
    items: Vec<GoogleEvent>,
}

#[derive(Debug, Deserialize)]
struct GoogleEvent {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(rename = "htmlLink", default)]
    html_link: Option<String>,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    start: Option<EventPoint>,
    #[serde(default)]
    end: Option<EventPoint>,
}

#[derive(Debug, Default, Deserialize)]
struct EventPoint {
    #[serde(default)]
    date: Option<String>,
    #[serde(rename = "dateTime", default)]
    date_time: Option<String>,
}

impl GoogleCalendarStore {
    pub fn new(config: &GoogleCalendarConfig, auth: Arc<GoogleTokenProvider>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::builder().build()?,
            auth,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
        })
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    async fn authorized(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder> {
        let token = self.auth.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }
}

#[async_trait]
impl EventStore for GoogleCalendarStore {
    async fn find(&self, name: &str, start_date: NaiveDate) -> Result<Option<StoreRecord>> {
        // The text query is fuzzy and the window is padded a day either
        // side; the post-filter below restores the exact identity match.
        let window_min = format!("{}T00:00:00Z", start_date - Duration::days(1));
        let window_max = format!("{}T00:00:00Z", start_date + Duration::days(2));
        let max_results = CALENDAR_FIND_MAX_RESULTS.to_string();

        let request = self.authorized(Method::GET, &self.events_url()).await?.query(&[
            ("q", name),
            ("timeMin", window_min.as_str()),
            ("timeMax", window_max.as_str()),
            ("singleEvents", "true"),
            ("maxResults", max_results.as_str()),
        ]);
        let response = self.http.send(request).await?;
        let listing: EventListing = read_json(response).await?;

        let target = name.trim().to_lowercase();
        let matched = listing
            .items
            .into_iter()
            .filter(|event| event.status.as_deref() != Some("cancelled"))
            .filter_map(decode_record)
            .find(|record| {
                record.name.trim().to_lowercase() == target
                    && record.dates.start.date() == start_date
            });

        debug!(name, %start_date, found = matched.is_some(), "calendar lookup");
        Ok(matched)
    }

    async fn create(&self, draft: &EventDraft) -> Result<StoreRecord> {
        draft.validate()?;
        let body = build_event_body(draft);
        let request = self.authorized(Method::POST, &self.events_url()).await?.json(&body);
        let response = self.http.send(request).await?;
        let event: GoogleEvent = read_json(response).await?;

        let id = event.id.clone();
        decode_record(event).ok_or_else(|| {
            ScholarSyncError::Internal(format!("created calendar event {id} carries no dates"))
        })
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<StoreRecord> {
        if patch.is_empty() {
            return Err(ScholarSyncError::Validation(
                "update supplies no fields to change".to_string(),
            ));
        }

        let url = format!("{}/{}", self.events_url(), id);
        let request = self.authorized(Method::PATCH, &url).await?.json(&patch_body(patch));
        let response = self.http.send(request).await?;
        let event: GoogleEvent = read_json(response).await?;

        let id = event.id.clone();
        decode_record(event).ok_or_else(|| {
            ScholarSyncError::Internal(format!("patched calendar event {id} carries no dates"))
        })
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error("google calendar", status, &body));
    }
    response.json::<T>().await.map_err(|err| InfraError::from(err).0)
}

fn build_event_body(draft: &EventDraft) -> Value {
    let (start, end) = encode_dates(&draft.dates);
    let mut body = serde_json::Map::new();
    body.insert("summary".to_string(), Value::String(draft.name.clone()));
    body.insert("start".to_string(), start);
    body.insert("end".to_string(), end);
    if let Some(place) = &draft.place {
        body.insert("location".to_string(), Value::String(place.clone()));
    }
    if let Some(notes) = &draft.notes {
        body.insert("description".to_string(), Value::String(notes.clone()));
    }
    if let Some(link) = &draft.link {
        body.insert("source".to_string(), json!({ "title": draft.name, "url": link }));
    }
    Value::Object(body)
}

fn patch_body(patch: &EventPatch) -> Value {
    let mut body = serde_json::Map::new();
    if let Some(name) = &patch.name {
        body.insert("summary".to_string(), Value::String(name.clone()));
    }
    if let Some(start) = patch.start {
        // Both bounds are re-encoded together so the exclusive-end shift
        // stays consistent with the new start.
        let (start_value, end_value) = encode_dates(&EventDates::new(start, patch.end));
        body.insert("start".to_string(), start_value);
        body.insert("end".to_string(), end_value);
    }
    if let Some(place) = &patch.place {
        body.insert("location".to_string(), Value::String(place.clone()));
    }
    if let Some(notes) = &patch.notes {
        body.insert("description".to_string(), Value::String(notes.clone()));
    }
    if let Some(link) = &patch.link {
        body.insert("source".to_string(), json!({ "url": link }));
    }
    Value::Object(body)
}

fn encode_dates(dates: &EventDates) -> (Value, Value) {
    match dates.start {
        EventDateTime::AllDay(start) => {
            let last_day = dates.end.map_or(start, |end| end.date());
            let exclusive_end = last_day + Duration::days(1);
            (
                json!({ "date": start.to_string() }),
                json!({ "date": exclusive_end.to_string() }),
            )
        }
        EventDateTime::Timed(start) => {
            let end = match dates.end {
                Some(EventDateTime::Timed(ts)) => ts,
                Some(EventDateTime::AllDay(day)) => {
                    // Day-precision end on a timed event keeps the clock time.
                    start + Duration::days((day - start.date_naive()).num_days())
                }
                None => start + Duration::minutes(DEFAULT_TIMED_EVENT_MINUTES),
            };
            (
                json!({ "dateTime": start.to_rfc3339() }),
                json!({ "dateTime": end.to_rfc3339() }),
            )
        }
    }
}

fn decode_point(point: &EventPoint) -> Option<EventDateTime> {
    if let Some(date) = &point.date {
        return NaiveDate::parse_from_str(date, "%Y-%m-%d").ok().map(EventDateTime::AllDay);
    }
    let raw = point.date_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw).ok().map(EventDateTime::Timed)
}

fn decode_dates(event: &GoogleEvent) -> Option<EventDates> {
    let start = decode_point(event.start.as_ref()?)?;
    let end = event.end.as_ref().and_then(decode_point);
    let end = match (start, end) {
        (EventDateTime::AllDay(first), Some(EventDateTime::AllDay(exclusive))) => {
            // Undo the exclusive convention; a one-day event has no end.
            let last = exclusive - Duration::days(1);
            (last > first).then_some(EventDateTime::AllDay(last))
        }
        (_, other) => other,
    };
    Some(EventDates::new(start, end))
}

fn decode_record(event: GoogleEvent) -> Option<StoreRecord> {
    let dates = decode_dates(&event)?;
    Some(StoreRecord {
        id: event.id,
        url: event.html_link,
        last_edited: event.updated.as_deref().and_then(parse_updated),
        name: event.summary.unwrap_or_default(),
        dates,
        place: event.location,
        notes: event.description,
    })
}

fn parse_updated(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.with_timezone(&Utc))
}
