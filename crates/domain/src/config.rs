//! Configuration management

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALENDAR_ID, DEFAULT_TIMEZONE, GOOGLE_CALENDAR_BASE_URL, GOOGLE_TOKEN_URL,
    NOTION_API_BASE_URL,
};
use crate::errors::{Result, ScholarSyncError};

/// Application configuration, assembled once at startup and passed by
/// reference into each adapter's constructor. Business logic never reads
/// the environment directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub notion: NotionConfig,
    /// Absent means the calendar integration is disabled and the hub runs
    /// in database-only mode.
    pub google: Option<GoogleCalendarConfig>,
    pub folders: FolderConfig,
    /// IANA zone applied to timestamps that arrive without a UTC offset.
    pub timezone: String,
    #[serde(default)]
    pub papers: PaperConfig,
}

/// Notion integration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(skip_serializing)]
    pub api_token: String,
    pub schedule_database_id: String,
    pub papers_database_id: Option<String>,
    pub base_url: String,
}

/// Google Calendar integration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCalendarConfig {
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    #[serde(skip_serializing)]
    pub refresh_token: String,
    pub calendar_id: String,
    pub base_url: String,
    pub token_url: String,
}

/// Folder mirror settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    pub base_dir: PathBuf,
}

/// Literature classification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperConfig {
    #[serde(default)]
    pub interest_keywords: InterestKeywords,
    #[serde(default)]
    pub category_rules: Vec<CategoryRule>,
}

/// Keyword lists driving the 관심도 classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterestKeywords {
    #[serde(default)]
    pub must_read: Vec<String>,
    #[serde(default)]
    pub interested: Vec<String>,
}

/// One category with the keywords that select it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl AppConfig {
    /// Parsed default timezone.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            ScholarSyncError::Config(format!("unknown timezone '{}'", self.timezone))
        })
    }

    /// One-shot startup validation. Called once by the loader; adapters
    /// may assume a validated config afterwards.
    pub fn validate(&self) -> Result<()> {
        if self.notion.api_token.trim().is_empty() {
            return Err(ScholarSyncError::Config("NOTION_API_TOKEN is not set".to_string()));
        }
        if self.notion.schedule_database_id.trim().is_empty() {
            return Err(ScholarSyncError::Config("NOTION_SCHEDULE_DB is not set".to_string()));
        }
        self.tz()?;
        if let Some(google) = &self.google {
            google.validate()?;
        }
        Ok(())
    }
}

impl NotionConfig {
    pub fn new(api_token: String, schedule_database_id: String) -> Self {
        Self {
            api_token,
            schedule_database_id,
            papers_database_id: None,
            base_url: NOTION_API_BASE_URL.to_string(),
        }
    }
}

impl GoogleCalendarConfig {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client_id,
            client_secret,
            refresh_token,
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            base_url: GOOGLE_CALENDAR_BASE_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty()
            || self.client_secret.trim().is_empty()
            || self.refresh_token.trim().is_empty()
        {
            return Err(ScholarSyncError::Config(
                "google calendar integration needs GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self { base_dir: PathBuf::from(crate::constants::DEFAULT_FOLDER_BASE) }
    }
}

/// Default timezone applied when nothing is configured.
pub fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}
