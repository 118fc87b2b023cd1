//! Application context - dependency injection container

use std::sync::Arc;

use scholarsync_core::{EventDirectory, FolderMirror, PaperPushService, ReconcileService};
use scholarsync_domain::{AppConfig, Result};
use scholarsync_infra::{
    load_config, GoogleCalendarStore, GoogleTokenProvider, LocalFolderMirror, NotionClient,
    NotionPaperIndex, NotionScheduleStore,
};

/// Holds every wired service for one process. Built once at startup and
/// borrowed by each command.
pub struct AppContext {
    pub config: AppConfig,
    pub reconciler: ReconcileService,
    pub directory: Arc<dyn EventDirectory>,
    pub folders: Arc<dyn FolderMirror>,
    /// Present only when a papers database id is configured.
    pub papers: Option<PaperPushService>,
}

impl AppContext {
    /// Load configuration from the environment and wire every adapter.
    pub fn new() -> Result<Self> {
        Self::from_config(load_config()?)
    }

    /// Wire adapters for an already-validated configuration.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = NotionClient::new(&config.notion)?;
        let schedule = Arc::new(NotionScheduleStore::new(
            client.clone(),
            config.notion.schedule_database_id.clone(),
        ));
        let directory: Arc<dyn EventDirectory> = schedule.clone();
        let folders: Arc<dyn FolderMirror> =
            Arc::new(LocalFolderMirror::new(config.folders.base_dir.clone()));

        let mut reconciler =
            ReconcileService::new(schedule, directory.clone(), folders.clone());
        if let Some(google) = &config.google {
            let auth = Arc::new(GoogleTokenProvider::new(google.clone())?);
            let calendar = Arc::new(GoogleCalendarStore::new(google, auth)?);
            reconciler = reconciler.with_calendar(calendar);
        }

        let papers = config.notion.papers_database_id.clone().map(|database_id| {
            let index = Arc::new(NotionPaperIndex::new(client, database_id));
            PaperPushService::new(index, config.papers.clone())
        });

        Ok(Self { config, reconciler, directory, folders, papers })
    }
}
