//! Configuration loader
//!
//! Settings come from environment variables layered over an optional TOML
//! file; the environment always wins. Secrets are expected from the
//! environment (usually via a local `.env`), while the literature
//! classification keyword lists only fit in the file.
//!
//! ## Environment Variables
//! - `NOTION_API_TOKEN`: Notion integration token (required)
//! - `NOTION_SCHEDULE_DB`: schedule database id (required)
//! - `NOTION_PAPERS_DB`: papers database id (optional; enables the push pipeline)
//! - `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET` / `GOOGLE_REFRESH_TOKEN`:
//!   OAuth credentials; all three or none (calendar disabled when absent)
//! - `GOOGLE_CALENDAR_ID`: target calendar, defaults to `primary`
//! - `SCHOLARSYNC_TIMEZONE`: IANA zone for bare timestamps, defaults to `Asia/Seoul`
//! - `SCHOLARSYNC_FOLDER_BASE`: folder mirror root, defaults to `~/Conferences`
//! - `SCHOLARSYNC_CONFIG`: explicit config file path
//!
//! ## File Locations
//! Without `SCHOLARSYNC_CONFIG` the loader probes, in order:
//! 1. `./scholarsync.toml`
//! 2. `~/.config/scholarsync/config.toml`

use std::path::PathBuf;

use serde::Deserialize;

use scholarsync_domain::constants::DEFAULT_FOLDER_BASE;
use scholarsync_domain::{
    default_timezone, AppConfig, FolderConfig, GoogleCalendarConfig, NotionConfig, PaperConfig,
    Result, ScholarSyncError,
};

/// Shape of the optional TOML file. Everything is optional here; required
/// fields are enforced after merging with the environment.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    notion: FileNotion,
    #[serde(default)]
    google: FileGoogle,
    #[serde(default)]
    folders: FileFolders,
    timezone: Option<String>,
    #[serde(default)]
    papers: PaperConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileNotion {
    api_token: Option<String>,
    schedule_database_id: Option<String>,
    papers_database_id: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileGoogle {
    client_id: Option<String>,
    client_secret: Option<String>,
    refresh_token: Option<String>,
    calendar_id: Option<String>,
    base_url: Option<String>,
    token_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileFolders {
    base_dir: Option<String>,
}

/// Load and validate the full application configuration.
///
/// # Errors
/// Returns `ScholarSyncError::Config` when a required setting is missing,
/// the file cannot be parsed, or the Google credentials are incomplete.
pub fn load_config() -> Result<AppConfig> {
    let file = load_file_config()?.unwrap_or_default();
    let config = assemble(file)?;
    config.validate()?;
    Ok(config)
}

fn assemble(file: FileConfig) -> Result<AppConfig> {
    let api_token = setting("NOTION_API_TOKEN", file.notion.api_token)
        .ok_or_else(|| ScholarSyncError::Config("NOTION_API_TOKEN is not set".to_string()))?;
    let schedule_database_id = setting("NOTION_SCHEDULE_DB", file.notion.schedule_database_id)
        .ok_or_else(|| ScholarSyncError::Config("NOTION_SCHEDULE_DB is not set".to_string()))?;

    let mut notion = NotionConfig::new(api_token, schedule_database_id);
    notion.papers_database_id = setting("NOTION_PAPERS_DB", file.notion.papers_database_id);
    if let Some(base_url) = file.notion.base_url {
        notion.base_url = base_url;
    }

    let google = assemble_google(file.google)?;

    let base_dir = setting("SCHOLARSYNC_FOLDER_BASE", file.folders.base_dir)
        .unwrap_or_else(|| DEFAULT_FOLDER_BASE.to_string());
    let folders = FolderConfig { base_dir: expand_home(&base_dir) };

    let timezone = setting("SCHOLARSYNC_TIMEZONE", file.timezone).unwrap_or_else(default_timezone);

    Ok(AppConfig { notion, google, folders, timezone, papers: file.papers })
}

/// All three OAuth credentials or none. A partial set is a configuration
/// mistake rather than "calendar disabled", so it fails loudly.
fn assemble_google(file: FileGoogle) -> Result<Option<GoogleCalendarConfig>> {
    let client_id = setting("GOOGLE_CLIENT_ID", file.client_id);
    let client_secret = setting("GOOGLE_CLIENT_SECRET", file.client_secret);
    let refresh_token = setting("GOOGLE_REFRESH_TOKEN", file.refresh_token);

    let supplied =
        [&client_id, &client_secret, &refresh_token].iter().filter(|v| v.is_some()).count();
    let google = match (client_id, client_secret, refresh_token) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => {
            let mut google = GoogleCalendarConfig::new(client_id, client_secret, refresh_token);
            if let Some(calendar_id) = setting("GOOGLE_CALENDAR_ID", file.calendar_id) {
                google.calendar_id = calendar_id;
            }
            if let Some(base_url) = file.base_url {
                google.base_url = base_url;
            }
            if let Some(token_url) = file.token_url {
                google.token_url = token_url;
            }
            Some(google)
        }
        _ if supplied > 0 => {
            return Err(ScholarSyncError::Config(
                "google calendar integration needs GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET and GOOGLE_REFRESH_TOKEN".to_string(),
            ));
        }
        _ => None,
    };
    Ok(google)
}

fn load_file_config() -> Result<Option<FileConfig>> {
    let explicit = std::env::var("SCHOLARSYNC_CONFIG").ok().filter(|v| !v.trim().is_empty());
    let path = match explicit {
        Some(raw) => {
            let path = expand_home(&raw);
            if !path.exists() {
                return Err(ScholarSyncError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path)
        }
        None => probe_config_paths(),
    };

    let Some(path) = path else {
        return Ok(None);
    };

    tracing::info!(path = %path.display(), "loading configuration file");
    let contents = std::fs::read_to_string(&path).map_err(|e| {
        ScholarSyncError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    let parsed = toml::from_str::<FileConfig>(&contents).map_err(|e| {
        ScholarSyncError::Config(format!("invalid TOML in {}: {e}", path.display()))
    })?;
    Ok(Some(parsed))
}

fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("scholarsync.toml"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".config/scholarsync/config.toml"));
    }
    candidates.into_iter().find(|path| path.exists())
}

/// Environment variable layered over the file value. Blank env entries
/// count as unset.
fn setting(env_key: &str, file_value: Option<String>) -> Option<String> {
    std::env::var(env_key).ok().filter(|v| !v.trim().is_empty()).or(file_value)
}

fn expand_home(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home);
        }
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}
