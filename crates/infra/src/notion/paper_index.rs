//! Notion implementation of the literature index.
//!
//! The key scan pages through the whole database collecting DOI urls and
//! title prefixes; page creation writes the property set the 논문 database
//! expects, with the abstract (and 한글 번역 when present) as body blocks.

use async_trait::async_trait;
use scholarsync_core::{ExistingKeys, PaperIndex, PaperMeta};
use scholarsync_domain::constants::{
    NOTION_MULTI_SELECT_LIMIT, NOTION_QUERY_PAGE_SIZE, NOTION_SELECT_LIMIT, NOTION_TEXT_LIMIT,
    SUMMARY_FALLBACK_CHARS, TITLE_DEDUP_PREFIX_CHARS,
};
use scholarsync_domain::utils::dates::pad_publication_date;
use scholarsync_domain::{chunk_text, truncate_chars, PaperRecord, Result, ScholarSyncError};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::client::NotionClient;
use super::props::{
    checkbox_prop, multi_select_prop, read_title, read_url, rich_text_prop, select_prop,
    title_prop, url_prop,
};

const PROP_TITLE: &str = "Title";
const PROP_AUTHOR: &str = "Author";
const PROP_JOURNAL: &str = "Journal Name";
const PROP_SUMMARY: &str = "Summary";
const PROP_INTEREST: &str = "관심도";
const PROP_READ: &str = "읽음";
const PROP_TYPE: &str = "Type";
const PROP_AFFILIATIONS: &str = "Affiliations";
const PROP_VOLUME: &str = "Vol";
const PROP_ISSUE: &str = "Issue";
const PROP_DOI: &str = "DOI";
const PROP_PUB_DATE: &str = "Publication Date";
const PROP_KEYWORDS: &str = "Keywords";
const PROP_CATEGORY: &str = "Category";

pub struct NotionPaperIndex {
    client: NotionClient,
    database_id: String,
}

impl NotionPaperIndex {
    pub fn new(client: NotionClient, database_id: impl Into<String>) -> Self {
        Self { client, database_id: database_id.into() }
    }

    fn build_properties(paper: &PaperRecord, meta: &PaperMeta) -> Value {
        let mut props = Map::new();
        props.insert(PROP_TITLE.to_string(), title_prop(&paper.title));
        props.insert(PROP_AUTHOR.to_string(), rich_text_prop(&paper.authors));

        let journal = paper.display_journal();
        if !journal.is_empty() {
            props.insert(PROP_JOURNAL.to_string(), select_prop(journal));
        }

        // Collector-supplied 한글 요약 when present, otherwise the opening
        // of the abstract.
        let summary = paper
            .summary_ko
            .as_deref()
            .filter(|s| !s.is_empty())
            .map_or_else(
                || truncate_chars(&paper.abstract_text, SUMMARY_FALLBACK_CHARS).to_string(),
                ToString::to_string,
            );
        props.insert(PROP_SUMMARY.to_string(), rich_text_prop(&summary));

        props.insert(PROP_INTEREST.to_string(), select_prop(meta.interest.label()));
        props.insert(PROP_READ.to_string(), checkbox_prop(false));
        props.insert(PROP_TYPE.to_string(), select_prop(&meta.publication_type));

        if !paper.affiliation.is_empty() {
            props.insert(PROP_AFFILIATIONS.to_string(), rich_text_prop(&paper.affiliation));
        }
        if !paper.volume.is_empty() {
            props.insert(PROP_VOLUME.to_string(), rich_text_prop(&paper.volume));
        }
        if !paper.issue.is_empty() {
            props.insert(PROP_ISSUE.to_string(), rich_text_prop(&paper.issue));
        }
        if !paper.doi_url.is_empty() {
            props.insert(PROP_DOI.to_string(), url_prop(&paper.doi_url));
        }
        if !paper.pub_date.is_empty() {
            props.insert(
                PROP_PUB_DATE.to_string(),
                json!({ "date": { "start": pad_publication_date(&paper.pub_date) } }),
            );
        }
        if !paper.keywords.is_empty() {
            let names: Vec<&str> = paper
                .keywords
                .iter()
                .take(NOTION_MULTI_SELECT_LIMIT)
                .map(|kw| truncate_chars(kw, NOTION_SELECT_LIMIT))
                .collect();
            props.insert(PROP_KEYWORDS.to_string(), multi_select_prop(names));
        }
        if !meta.categories.is_empty() {
            props.insert(
                PROP_CATEGORY.to_string(),
                multi_select_prop(meta.categories.iter().take(NOTION_MULTI_SELECT_LIMIT)),
            );
        }

        Value::Object(props)
    }

    fn abstract_blocks(paper: &PaperRecord) -> Vec<Value> {
        let mut blocks = Vec::new();

        if !paper.abstract_text.is_empty() {
            blocks.push(heading_block("Abstract"));
            for chunk in chunk_text(&paper.abstract_text, NOTION_TEXT_LIMIT) {
                blocks.push(paragraph_block(chunk));
            }
        }

        if let Some(translation) = paper.translation_ko.as_deref().filter(|t| !t.is_empty()) {
            blocks.push(json!({ "object": "block", "type": "divider", "divider": {} }));
            blocks.push(heading_block("한글 번역"));
            for chunk in chunk_text(translation, NOTION_TEXT_LIMIT) {
                blocks.push(paragraph_block(chunk));
            }
        }

        blocks
    }
}

fn heading_block(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "heading_2",
        "heading_2": { "rich_text": [{ "type": "text", "text": { "content": text } }] }
    })
}

fn paragraph_block(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": [{ "type": "text", "text": { "content": text } }] }
    })
}

#[async_trait]
impl PaperIndex for NotionPaperIndex {
    async fn existing_keys(&self) -> Result<ExistingKeys> {
        let mut keys = ExistingKeys::default();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": NOTION_QUERY_PAGE_SIZE });
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }
            let response = self.client.query_database(&self.database_id, &body).await?;

            if let Some(results) = response.get("results").and_then(Value::as_array) {
                for page in results {
                    let Some(props) = page.get("properties") else { continue };
                    if let Some(doi) = read_url(props, PROP_DOI) {
                        keys.insert(doi);
                    }
                    if let Some(title) = read_title(props, PROP_TITLE) {
                        keys.insert(truncate_chars(title.trim(), TITLE_DEDUP_PREFIX_CHARS));
                    }
                }
            }

            let has_more = response.get("has_more").and_then(Value::as_bool).unwrap_or(false);
            cursor = response.get("next_cursor").and_then(Value::as_str).map(ToString::to_string);
            if !has_more || cursor.is_none() {
                break;
            }
        }

        debug!(keys = keys.len(), "collected literature dedup keys");
        Ok(keys)
    }

    async fn create_paper(&self, paper: &PaperRecord, meta: &PaperMeta) -> Result<String> {
        let mut body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::build_properties(paper, meta),
        });
        let children = Self::abstract_blocks(paper);
        if !children.is_empty() {
            body["children"] = Value::Array(children);
        }

        let page = self.client.post_json("pages", &body).await?;
        page.get("id").and_then(Value::as_str).map(ToString::to_string).ok_or_else(|| {
            ScholarSyncError::Internal("created page response carries no id".to_string())
        })
    }
}
