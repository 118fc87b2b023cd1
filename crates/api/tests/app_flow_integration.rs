//! End-to-end flows through the wired application context
//!
//! **Coverage:**
//! - add: duplicate resolution and writes against mock Notion and Google
//!   Calendar APIs, including the exclusive all-day end on the wire
//! - add in database-only mode when the calendar is not configured
//! - update: span-preserving date shift reaching both backends
//! - literature push from a JSON export file
//! - conference folder idempotency

use std::path::Path;

use scholarsync_core::WriteAction;
use scholarsync_domain::{
    AppConfig, FolderConfig, GoogleCalendarConfig, NotionConfig, PaperConfig,
};
use scholarsync_lib::commands::schedule::{EventInput, PatchInput};
use scholarsync_lib::commands::{papers, schedule};
use scholarsync_lib::AppContext;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(notion: &MockServer, google: Option<&MockServer>, base_dir: &Path) -> AppConfig {
    let mut notion_config = NotionConfig::new("secret-token".to_string(), "sched-db".to_string());
    notion_config.base_url = notion.uri();

    let google_config = google.map(|server| {
        let mut config = GoogleCalendarConfig::new(
            "client-id".to_string(),
            "client-secret".to_string(),
            "refresh-token".to_string(),
        );
        config.base_url = server.uri();
        config.token_url = format!("{}/token", server.uri());
        config.calendar_id = "cal1".to_string();
        config
    });

    AppConfig {
        notion: notion_config,
        google: google_config,
        folders: FolderConfig { base_dir: base_dir.to_path_buf() },
        timezone: "Asia/Seoul".to_string(),
        papers: PaperConfig::default(),
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;
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

fn all_day_event(id: &str, summary: &str, start: &str, exclusive_end: &str) -> serde_json::Value {
    json!({
        "id": id,
        "status": "confirmed",
        "summary": summary,
        "htmlLink": format!("https://calendar.google.com/event?eid={id}"),
        "updated": "2026-03-01T00:00:00Z",
        "start": { "date": start },
        "end": { "date": exclusive_end }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn add_creates_the_event_in_both_backends_and_the_folder() {
    let notion = MockServer::start().await;
    let google = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    Mock::given(method("POST"))
        .and(path("/databases/sched-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&notion)
        .await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": "sched-db" },
            "properties": {
                "Date": { "date": { "start": "2026-03-10", "end": "2026-03-12" } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "db-page-1",
            "APSS 2026",
            "2026-03-10",
            Some("2026-03-12"),
        )))
        .expect(1)
        .mount(&notion)
        .await;

    mount_token(&google).await;
    Mock::given(method("GET"))
        .and(path("/calendars/cal1/events"))
        .and(query_param("q", "APSS 2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .expect(1)
        .mount(&google)
        .await;
    // Three attended days go out with the exclusive end on the 13th.
    Mock::given(method("POST"))
        .and(path("/calendars/cal1/events"))
        .and(body_partial_json(json!({
            "summary": "APSS 2026",
            "start": { "date": "2026-03-10" },
            "end": { "date": "2026-03-13" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_day_event(
            "ev-1",
            "APSS 2026",
            "2026-03-10",
            "2026-03-13",
        )))
        .expect(1)
        .mount(&google)
        .await;

    let ctx = AppContext::from_config(config_for(&notion, Some(&google), dir.path()))
        .expect("context should build");
    let input = EventInput {
        name: "APSS 2026".to_string(),
        start: "2026-03-10".to_string(),
        end: Some("2026-03-12".to_string()),
        place: Some("Seoul".to_string()),
        ..EventInput::default()
    };

    let report = schedule::add(&ctx, input, true).await.expect("add should succeed");

    assert!(report.success);
    assert_eq!(report.resolution, "no_duplicate");
    assert_eq!(report.notion.action, WriteAction::Created);
    assert_eq!(report.notion.id.as_deref(), Some("db-page-1"));
    assert_eq!(report.google_calendar.action, WriteAction::Created);
    assert_eq!(report.google_calendar.id.as_deref(), Some("ev-1"));

    let folder = report.folder.expect("folder requested");
    assert!(folder.success);
    let expected = dir.path().join("2026").join("2026-03-10 APSS 2026");
    assert_eq!(folder.path.as_deref(), Some(expected.as_path()));
    assert!(expected.is_dir());
}

#[tokio::test(flavor = "multi_thread")]
async fn add_skips_every_backend_on_a_full_duplicate() {
    let notion = MockServer::start().await;
    let google = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    Mock::given(method("POST"))
        .and(path("/databases/sched-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page("db-page-9", "APSS 2026", "2026-03-10", Some("2026-03-12"))]
        })))
        .expect(1)
        .mount(&notion)
        .await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "never" })))
        .expect(0)
        .mount(&notion)
        .await;

    mount_token(&google).await;
    Mock::given(method("GET"))
        .and(path("/calendars/cal1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [all_day_event("ev-9", "APSS 2026", "2026-03-10", "2026-03-13")]
        })))
        .expect(1)
        .mount(&google)
        .await;
    Mock::given(method("POST"))
        .and(path("/calendars/cal1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "never" })))
        .expect(0)
        .mount(&google)
        .await;

    let ctx = AppContext::from_config(config_for(&notion, Some(&google), dir.path()))
        .expect("context should build");
    let input = EventInput {
        name: "APSS 2026".to_string(),
        start: "2026-03-10".to_string(),
        ..EventInput::default()
    };

    let report = schedule::add(&ctx, input, false).await.expect("add should succeed");

    assert!(report.success);
    assert_eq!(report.resolution, "fully_duplicate");
    assert_eq!(report.notion.action, WriteAction::Skipped);
    assert_eq!(report.notion.id.as_deref(), Some("db-page-9"));
    assert_eq!(report.google_calendar.action, WriteAction::Skipped);
    assert_eq!(report.google_calendar.id.as_deref(), Some("ev-9"));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_without_calendar_configured_still_writes_the_database() {
    let notion = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    Mock::given(method("POST"))
        .and(path("/databases/sched-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&notion)
        .await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "db-page-1",
            "Lab Retreat",
            "2026-05-02",
            None,
        )))
        .expect(1)
        .mount(&notion)
        .await;

    let ctx =
        AppContext::from_config(config_for(&notion, None, dir.path())).expect("context should build");
    let input = EventInput {
        name: "Lab Retreat".to_string(),
        start: "2026-05-02".to_string(),
        ..EventInput::default()
    };

    let report = schedule::add(&ctx, input, false).await.expect("add should succeed");

    assert!(report.success);
    assert_eq!(report.notion.action, WriteAction::Created);
    assert_eq!(report.google_calendar.action, WriteAction::Skipped);
    assert!(!report.google_calendar.success);
    assert!(report.google_calendar.note.as_deref().unwrap().contains("not configured"));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_start_shift_carries_the_span_into_both_backends() {
    let notion = MockServer::start().await;
    let google = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    // Stored record: three all-day days, 2026-03-11 through 2026-03-13.
    Mock::given(method("GET"))
        .and(path("/pages/db-page-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "db-page-1",
            "APSS 2026",
            "2026-03-11",
            Some("2026-03-13"),
        )))
        .expect(1)
        .mount(&notion)
        .await;
    // The database patch carries the merged range, inclusive as stored.
    Mock::given(method("PATCH"))
        .and(path("/pages/db-page-1"))
        .and(body_partial_json(json!({
            "properties": {
                "Date": { "date": { "start": "2026-04-01", "end": "2026-04-03" } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            "db-page-1",
            "APSS 2026",
            "2026-04-01",
            Some("2026-04-03"),
        )))
        .expect(1)
        .mount(&notion)
        .await;

    mount_token(&google).await;
    // The calendar twin is located by the record's pre-update identity.
    Mock::given(method("GET"))
        .and(path("/calendars/cal1/events"))
        .and(query_param("q", "APSS 2026"))
        .and(query_param("timeMin", "2026-03-10T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [all_day_event("ev-1", "APSS 2026", "2026-03-11", "2026-03-14")]
        })))
        .expect(1)
        .mount(&google)
        .await;
    // Same two-day span at the new start, exclusive again on the wire.
    Mock::given(method("PATCH"))
        .and(path("/calendars/cal1/events/ev-1"))
        .and(body_partial_json(json!({
            "start": { "date": "2026-04-01" },
            "end": { "date": "2026-04-04" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(all_day_event(
            "ev-1",
            "APSS 2026",
            "2026-04-01",
            "2026-04-04",
        )))
        .expect(1)
        .mount(&google)
        .await;

    let ctx = AppContext::from_config(config_for(&notion, Some(&google), dir.path()))
        .expect("context should build");
    let input = PatchInput {
        start: Some("2026-04-01".to_string()),
        ..PatchInput::default()
    };

    let report = schedule::update(&ctx, "db-page-1", input).await.expect("update should succeed");

    assert!(report.success);
    assert_eq!(report.notion.action, WriteAction::Updated);
    assert_eq!(report.google_calendar.action, WriteAction::Updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn push_papers_reads_the_export_and_creates_unknown_entries() {
    let notion = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    Mock::given(method("POST"))
        .and(path("/databases/papers-db/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [],
            "has_more": false
        })))
        .expect(1)
        .mount(&notion)
        .await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": "papers-db" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "paper-1" })))
        .expect(1)
        .mount(&notion)
        .await;

    let mut config = config_for(&notion, None, dir.path());
    config.notion.papers_database_id = Some("papers-db".to_string());
    let ctx = AppContext::from_config(config).expect("context should build");

    let export = dir.path().join("papers.json");
    std::fs::write(
        &export,
        json!([{
            "title": "Sleep spindles in adolescent insomnia",
            "doi_url": "https://doi.org/10.1000/sleep.2026.001"
        }])
        .to_string(),
    )
    .expect("write export");

    let report = papers::push_from_file(&ctx, &export).await.expect("push should succeed");

    assert!(report.success);
    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn folder_command_reports_the_second_run_as_existing() {
    let notion = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx =
        AppContext::from_config(config_for(&notion, None, dir.path())).expect("context should build");

    let first = schedule::create_folder(&ctx, "APSS 2026", "2026-03-10")
        .await
        .expect("first ensure");
    let second = schedule::create_folder(&ctx, "APSS 2026", "2026-03-10")
        .await
        .expect("second ensure");

    assert!(!first.existed);
    assert!(second.existed);
    assert_eq!(first.path, second.path);
}
