//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Notion API
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
pub const NOTION_QUERY_PAGE_SIZE: u32 = 100;
pub const NOTION_TEXT_LIMIT: usize = 2000;
pub const NOTION_SELECT_LIMIT: usize = 100;
pub const NOTION_MULTI_SELECT_LIMIT: usize = 5;
pub const NOTION_CREATE_GAP_MS: u64 = 350; // ~3 requests/second rate limit

// Google Calendar API
pub const GOOGLE_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const CALENDAR_FIND_MAX_RESULTS: u32 = 25;

// Reconciliation defaults
pub const DEFAULT_TIMEZONE: &str = "Asia/Seoul";
pub const DEFAULT_TIMED_EVENT_MINUTES: i64 = 60;

// Folder mirror
pub const DEFAULT_FOLDER_BASE: &str = "~/Conferences";

// Literature push
pub const TITLE_DEDUP_PREFIX_CHARS: usize = 50;
pub const SUMMARY_FALLBACK_CHARS: usize = 100;
