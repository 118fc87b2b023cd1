//! Notion implementation of the schedule store and directory ports.
//!
//! One page per event in the schedule database. The native duplicate query
//! is a title-contains plus date-equals filter; an exact case-insensitive
//! name comparison is applied afterwards to reject fuzzy matches.

use async_trait::async_trait;
use chrono::NaiveDate;
use scholarsync_core::{EventDirectory, EventStore};
use scholarsync_domain::constants::NOTION_QUERY_PAGE_SIZE;
use scholarsync_domain::{
    EventDates, EventDetail, EventDraft, EventPatch, EventSummary, ListFilter, Result,
    ScholarSyncError, StoreRecord,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::client::NotionClient;
use super::props::{
    date_prop, date_range_prop, multi_select_prop, read_date, read_date_range, read_multi_select,
    read_rich_text, read_select, read_timestamp, read_title, read_url, rich_text_prop, select_prop,
    title_prop, url_prop,
};

const PROP_NAME: &str = "Name";
const PROP_DATE: &str = "Date";
const PROP_PLACE: &str = "Place";
const PROP_NOTES: &str = "Notes";
const PROP_CATEGORY: &str = "Category";
const PROP_TAGS: &str = "Tags";
const PROP_STATUS: &str = "Status";
const PROP_LINK: &str = "Link";
const PROP_ABSTRACT_DEADLINE: &str = "Abstract Deadline";

/// Candidate window for one duplicate probe. The post-filter picks the
/// first exact name match out of these.
const FIND_PAGE_SIZE: u32 = 25;

pub struct NotionScheduleStore {
    client: NotionClient,
    database_id: String,
}

impl NotionScheduleStore {
    pub fn new(client: NotionClient, database_id: impl Into<String>) -> Self {
        Self { client, database_id: database_id.into() }
    }

    fn build_properties(draft: &EventDraft) -> Value {
        let mut props = Map::new();
        props.insert(PROP_NAME.to_string(), title_prop(&draft.name));
        props.insert(PROP_DATE.to_string(), date_range_prop(&draft.dates));
        if let Some(place) = &draft.place {
            props.insert(PROP_PLACE.to_string(), rich_text_prop(place));
        }
        if let Some(notes) = &draft.notes {
            props.insert(PROP_NOTES.to_string(), rich_text_prop(notes));
        }
        if let Some(category) = &draft.category {
            props.insert(PROP_CATEGORY.to_string(), select_prop(category));
        }
        if !draft.tags.is_empty() {
            props.insert(PROP_TAGS.to_string(), multi_select_prop(&draft.tags));
        }
        if let Some(status) = &draft.status {
            props.insert(PROP_STATUS.to_string(), select_prop(status));
        }
        if let Some(link) = &draft.link {
            props.insert(PROP_LINK.to_string(), url_prop(link));
        }
        if let Some(deadline) = draft.abstract_deadline {
            props.insert(PROP_ABSTRACT_DEADLINE.to_string(), date_prop(deadline));
        }
        Value::Object(props)
    }

    /// Only fields present in the patch are encoded; everything else keeps
    /// its stored value on the Notion side.
    fn patch_properties(patch: &EventPatch) -> Value {
        let mut props = Map::new();
        if let Some(name) = &patch.name {
            props.insert(PROP_NAME.to_string(), title_prop(name));
        }
        if let Some(start) = patch.start {
            props
                .insert(PROP_DATE.to_string(), date_range_prop(&EventDates::new(start, patch.end)));
        }
        if let Some(place) = &patch.place {
            props.insert(PROP_PLACE.to_string(), rich_text_prop(place));
        }
        if let Some(notes) = &patch.notes {
            props.insert(PROP_NOTES.to_string(), rich_text_prop(notes));
        }
        if let Some(category) = &patch.category {
            props.insert(PROP_CATEGORY.to_string(), select_prop(category));
        }
        if let Some(tags) = &patch.tags {
            props.insert(PROP_TAGS.to_string(), multi_select_prop(tags));
        }
        if let Some(status) = &patch.status {
            props.insert(PROP_STATUS.to_string(), select_prop(status));
        }
        if let Some(link) = &patch.link {
            props.insert(PROP_LINK.to_string(), url_prop(link));
        }
        if let Some(deadline) = patch.abstract_deadline {
            props.insert(PROP_ABSTRACT_DEADLINE.to_string(), date_prop(deadline));
        }
        Value::Object(props)
    }

    fn decode_record(page: &Value) -> Option<StoreRecord> {
        let props = page.get("properties")?;
        Some(StoreRecord {
            id: page.get("id")?.as_str()?.to_string(),
            url: page.get("url").and_then(Value::as_str).map(ToString::to_string),
            last_edited: read_timestamp(page, "last_edited_time"),
            name: read_title(props, PROP_NAME)?,
            dates: read_date_range(props, PROP_DATE)?,
            place: read_rich_text(props, PROP_PLACE),
            notes: read_rich_text(props, PROP_NOTES),
        })
    }

    fn decode_summary(page: &Value) -> Option<EventSummary> {
        let props = page.get("properties")?;
        Some(EventSummary {
            id: page.get("id")?.as_str()?.to_string(),
            name: read_title(props, PROP_NAME).unwrap_or_default(),
            dates: read_date_range(props, PROP_DATE),
            status: read_select(props, PROP_STATUS),
            category: read_select(props, PROP_CATEGORY),
            place: read_rich_text(props, PROP_PLACE),
            url: page.get("url").and_then(Value::as_str).map(ToString::to_string),
        })
    }

    fn decode_detail(page: &Value) -> Result<EventDetail> {
        let id = page
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ScholarSyncError::Internal("page response carries no id".to_string()))?
            .to_string();
        let props = page.get("properties").cloned().unwrap_or(Value::Null);
        Ok(EventDetail {
            id,
            // An unreadable name decodes as empty; the orchestrator treats
            // that as an unrecoverable identity, not an error.
            name: read_title(&props, PROP_NAME).unwrap_or_default(),
            dates: read_date_range(&props, PROP_DATE),
            place: read_rich_text(&props, PROP_PLACE),
            notes: read_rich_text(&props, PROP_NOTES),
            category: read_select(&props, PROP_CATEGORY),
            tags: read_multi_select(&props, PROP_TAGS),
            status: read_select(&props, PROP_STATUS),
            link: read_url(&props, PROP_LINK),
            abstract_deadline: read_date(&props, PROP_ABSTRACT_DEADLINE),
            url: page.get("url").and_then(Value::as_str).map(ToString::to_string),
            created_time: read_timestamp(page, "created_time"),
            last_edited: read_timestamp(page, "last_edited_time"),
            properties: props,
        })
    }

    fn page_size(limit: Option<u32>) -> u32 {
        limit.map_or(NOTION_QUERY_PAGE_SIZE, |limit| limit.min(NOTION_QUERY_PAGE_SIZE))
    }

    async fn query_summaries(&self, body: &Value) -> Result<Vec<EventSummary>> {
        let response = self.client.query_database(&self.database_id, body).await?;
        let summaries = response
            .get("results")
            .and_then(Value::as_array)
            .map(|results| results.iter().filter_map(Self::decode_summary).collect())
            .unwrap_or_default();
        Ok(summaries)
    }
}

#[async_trait]
impl EventStore for NotionScheduleStore {
    async fn find(&self, name: &str, start_date: NaiveDate) -> Result<Option<StoreRecord>> {
        let body = json!({
            "filter": { "and": [
                { "property": PROP_NAME, "title": { "contains": name } },
                { "property": PROP_DATE, "date": { "equals": start_date.format("%Y-%m-%d").to_string() } },
            ]},
            "page_size": FIND_PAGE_SIZE,
        });
        let response = self.client.query_database(&self.database_id, &body).await?;

        let target = name.trim().to_lowercase();
        let found = response
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| {
                results
                    .iter()
                    .filter_map(Self::decode_record)
                    .find(|record| record.name.trim().to_lowercase() == target)
            });
        debug!(name, %start_date, matched = found.is_some(), "database duplicate probe");
        Ok(found)
    }

    async fn create(&self, draft: &EventDraft) -> Result<StoreRecord> {
        draft.validate()?;
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::build_properties(draft),
        });
        let page = self.client.post_json("pages", &body).await?;
        Self::decode_record(&page).ok_or_else(|| {
            ScholarSyncError::Internal("created page is missing required properties".to_string())
        })
    }

    async fn update(&self, id: &str, patch: &EventPatch) -> Result<StoreRecord> {
        if patch.is_empty() {
            return Err(ScholarSyncError::Validation(
                "update supplies no fields to change".to_string(),
            ));
        }
        let body = json!({ "properties": Self::patch_properties(patch) });
        let page = self.client.patch_json(&format!("pages/{id}"), &body).await?;
        Self::decode_record(&page).ok_or_else(|| {
            ScholarSyncError::Internal("updated page is missing required properties".to_string())
        })
    }
}

#[async_trait]
impl EventDirectory for NotionScheduleStore {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<EventSummary>> {
        let mut conditions = Vec::new();
        if let Some(status) = &filter.status {
            conditions.push(json!({ "property": PROP_STATUS, "select": { "equals": status } }));
        }
        if let Some(category) = &filter.category {
            conditions.push(json!({ "property": PROP_CATEGORY, "select": { "equals": category } }));
        }
        if let Some(from) = filter.date_from {
            conditions.push(json!({
                "property": PROP_DATE,
                "date": { "on_or_after": from.format("%Y-%m-%d").to_string() },
            }));
        }
        if let Some(to) = filter.date_to {
            conditions.push(json!({
                "property": PROP_DATE,
                "date": { "on_or_before": to.format("%Y-%m-%d").to_string() },
            }));
        }

        let mut body = json!({
            "sorts": [{ "property": PROP_DATE, "direction": "descending" }],
            "page_size": Self::page_size(filter.limit),
        });
        if !conditions.is_empty() {
            body["filter"] = json!({ "and": conditions });
        }
        self.query_summaries(&body).await
    }

    async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<EventSummary>> {
        let body = json!({
            "filter": { "property": PROP_NAME, "title": { "contains": query } },
            "page_size": Self::page_size(limit),
        });
        self.query_summaries(&body).await
    }

    async fn get(&self, id: &str) -> Result<EventDetail> {
        let page = self.client.get_json(&format!("pages/{id}")).await?;
        Self::decode_detail(&page)
    }
}
