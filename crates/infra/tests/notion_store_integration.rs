//! Integration tests for the Notion schedule store over a mock API
//!
//! **Coverage:**
//! - duplicate probe: native filter shape plus the exact-name post-filter
//! - create/update payload shapes and response decoding
//! - directory list/search/get
//! - error mapping for 404 and 401 responses

use chrono::NaiveDate;
use scholarsync_core::{EventDirectory, EventStore};
use scholarsync_domain::{
    EventDateTime, EventDates, EventDraft, EventPatch, ListFilter, NotionConfig, ScholarSyncError,
};
use scholarsync_infra::{NotionClient, NotionScheduleStore};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> NotionScheduleStore {
    let mut config = NotionConfig::new("secret-token".to_string(), "db1".to_string());
    config.base_url = server.uri();
    let client = NotionClient::new(&config).expect("client should build");
    NotionScheduleStore::new(client, config.schedule_database_id)
}

fn day(s: &str) -> NaiveDate {
    s.parse().expect("test date")
}

fn page(id: &str, name: &str, start: &str, end: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "url": format!("https://notion.so/{id}"),
        "last_edited_time": "2026-03-01T00:00:00.000Z",
        "properties": {
            "Name": { "title": [{ "plain_text": name }] },
            "Date": { "date": { "start": start, "end": end } },
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn find_sends_the_native_identity_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(header("Notion-Version", "2022-06-28"))
        .and(body_partial_json(json!({
            "filter": { "and": [
                { "property": "Name", "title": { "contains": "APSS 2026" } },
                { "property": "Date", "date": { "equals": "2026-03-10" } },
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let found = store.find("APSS 2026", day("2026-03-10")).await.expect("find should succeed");
    assert!(found.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn find_post_filters_to_the_exact_name() {
    let server = MockServer::start().await;
    // The native query is title-contains, so a superset title comes back
    // too; only the case-insensitive full match may win.
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                page("page-fuzzy", "APSS 2026 Satellite Symposium", "2026-03-10", None),
                page("page-exact", "apss 2026", "2026-03-10", Some("2026-03-12")),
            ]
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let found = store.find("APSS 2026", day("2026-03-10")).await.expect("find should succeed");
    assert_eq!(found.expect("record should match").id, "page-exact");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_posts_parent_and_properties() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": "db1" },
            "properties": {
                "Name": { "title": [{ "text": { "content": "APSS 2026" } }] },
                "Date": { "date": { "start": "2026-03-10", "end": "2026-03-12" } },
                "Place": { "rich_text": [{ "text": { "content": "Bangkok" } }] },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "page-new",
            "APSS 2026",
            "2026-03-10",
            Some("2026-03-12"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = EventDraft::new(
        "APSS 2026",
        EventDates::all_day(day("2026-03-10"), Some(day("2026-03-12"))),
    );
    draft.place = Some("Bangkok".to_string());

    let store = store_for(&server);
    let record = store.create(&draft).await.expect("create should succeed");
    assert_eq!(record.id, "page-new");
    assert_eq!(record.dates.end, Some(EventDateTime::AllDay(day("2026-03-12"))));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_patches_only_the_supplied_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/pages/page-1"))
        .and(body_partial_json(json!({
            "properties": {
                "Place": { "rich_text": [{ "text": { "content": "Busan" } }] },
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "page-1",
            "APSS 2026",
            "2026-03-10",
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let patch = EventPatch { place: Some("Busan".to_string()), ..EventPatch::default() };
    let store = store_for(&server);
    let record = store.update("page-1", &patch).await.expect("update should succeed");
    assert_eq!(record.id, "page-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn list_sends_filters_and_descending_sort() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .and(body_partial_json(json!({
            "sorts": [{ "property": "Date", "direction": "descending" }],
            "page_size": 10,
            "filter": { "and": [
                { "property": "Status", "select": { "equals": "Registered" } },
                { "property": "Date", "date": { "on_or_after": "2026-01-01" } },
            ]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                page("page-2", "WorldSleep 2026", "2026-09-05", None),
                page("page-1", "APSS 2026", "2026-03-10", None),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ListFilter {
        status: Some("Registered".to_string()),
        date_from: Some(day("2026-01-01")),
        limit: Some(10),
        ..ListFilter::default()
    };
    let store = store_for(&server);
    let rows = store.list(&filter).await.expect("list should succeed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "WorldSleep 2026");
}

#[tokio::test(flavor = "multi_thread")]
async fn search_uses_a_title_contains_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .and(body_partial_json(json!({
            "filter": { "property": "Name", "title": { "contains": "Sleep" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("page-2", "WorldSleep 2026", "2026-09-05", None)]
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let rows = store.search("Sleep", None).await.expect("search should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "WorldSleep 2026");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_returns_detail_with_the_raw_property_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pages/page-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "page-1",
            "APSS 2026",
            "2026-03-10",
            Some("2026-03-12"),
        )))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let detail = store.get("page-1").await.expect("get should succeed");
    assert_eq!(detail.name, "APSS 2026");
    assert!(detail.properties.get("Date").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_page_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pages/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find page"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.get("missing").await.expect_err("get should fail");
    assert!(matches!(err, ScholarSyncError::NotFound(message) if message.contains("notion")));
}

#[tokio::test(flavor = "multi_thread")]
async fn auth_failure_maps_to_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/databases/db1/query"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "object": "error",
            "status": 401,
            "code": "unauthorized",
            "message": "API token is invalid."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.find("APSS 2026", day("2026-03-10")).await.expect_err("find should fail");
    assert!(matches!(err, ScholarSyncError::Backend(message) if message.contains("401")));
}
