//! Builders and readers for Notion property values.
//!
//! Builders clamp text to the API's hard limits (2000 chars for text
//! fragments, 100 for select names). Readers are lenient: a missing or
//! malformed property reads as absent, never as an error, because record
//! decoding must survive databases with drifted schemas.

use chrono::{DateTime, NaiveDate, Utc};
use scholarsync_domain::constants::{NOTION_SELECT_LIMIT, NOTION_TEXT_LIMIT};
use scholarsync_domain::{truncate_chars, EventDateTime, EventDates};
use serde_json::{json, Value};

/* -------------------------------------------------------------------------- */
/* Builders */
/* -------------------------------------------------------------------------- */

pub(crate) fn title_prop(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": truncate_chars(text, NOTION_TEXT_LIMIT) } }] })
}

pub(crate) fn rich_text_prop(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": truncate_chars(text, NOTION_TEXT_LIMIT) } }] })
}

pub(crate) fn select_prop(name: &str) -> Value {
    json!({ "select": { "name": truncate_chars(name, NOTION_SELECT_LIMIT) } })
}

pub(crate) fn multi_select_prop<I, S>(names: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let options: Vec<Value> =
        names.into_iter().map(|name| json!({ "name": name.as_ref() })).collect();
    json!({ "multi_select": options })
}

pub(crate) fn url_prop(url: &str) -> Value {
    json!({ "url": url })
}

pub(crate) fn checkbox_prop(value: bool) -> Value {
    json!({ "checkbox": value })
}

pub(crate) fn date_range_prop(dates: &EventDates) -> Value {
    let end = match dates.end {
        Some(end) => Value::String(end.to_string()),
        None => Value::Null,
    };
    json!({ "date": { "start": dates.start.to_string(), "end": end } })
}

pub(crate) fn date_prop(date: NaiveDate) -> Value {
    json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } })
}

/* -------------------------------------------------------------------------- */
/* Readers */
/* -------------------------------------------------------------------------- */

fn fragments_text(prop: &Value, key: &str) -> Option<String> {
    let fragments = prop.get(key)?.as_array()?;
    let mut text = String::new();
    for fragment in fragments {
        if let Some(plain) = fragment.get("plain_text").and_then(Value::as_str) {
            text.push_str(plain);
        } else if let Some(content) =
            fragment.pointer("/text/content").and_then(Value::as_str)
        {
            text.push_str(content);
        }
    }
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

pub(crate) fn read_title(props: &Value, name: &str) -> Option<String> {
    fragments_text(props.get(name)?, "title")
}

pub(crate) fn read_rich_text(props: &Value, name: &str) -> Option<String> {
    fragments_text(props.get(name)?, "rich_text")
}

pub(crate) fn read_select(props: &Value, name: &str) -> Option<String> {
    props
        .get(name)?
        .pointer("/select/name")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

pub(crate) fn read_multi_select(props: &Value, name: &str) -> Vec<String> {
    props
        .get(name)
        .and_then(|prop| prop.get("multi_select"))
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(|option| option.get("name").and_then(Value::as_str))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn read_url(props: &Value, name: &str) -> Option<String> {
    props.get(name)?.get("url").and_then(Value::as_str).map(ToString::to_string)
}

pub(crate) fn read_date_range(props: &Value, name: &str) -> Option<EventDates> {
    let date = props.get(name)?.get("date")?;
    let start = parse_date_point(date.get("start")?.as_str()?)?;
    let end = date.get("end").and_then(Value::as_str).and_then(parse_date_point);
    Some(EventDates::new(start, end))
}

pub(crate) fn read_date(props: &Value, name: &str) -> Option<NaiveDate> {
    let raw = props.get(name)?.pointer("/date/start")?.as_str()?;
    match parse_date_point(raw)? {
        EventDateTime::AllDay(date) => Some(date),
        EventDateTime::Timed(ts) => Some(ts.date_naive()),
    }
}

/// Decode one Notion date string: `YYYY-MM-DD` is a day, anything else is
/// an RFC 3339 timestamp with offset.
pub(crate) fn parse_date_point(raw: &str) -> Option<EventDateTime> {
    if raw.len() == 10 {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(EventDateTime::AllDay);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(EventDateTime::Timed)
}

/// Page-level timestamp such as `last_edited_time`.
pub(crate) fn read_timestamp(page: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = page.get(key)?.as_str()?;
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.with_timezone(&Utc))
}
