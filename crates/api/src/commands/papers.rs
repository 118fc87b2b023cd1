//! Literature push command.

use std::path::Path;

use scholarsync_core::PaperPushReport;
use scholarsync_domain::{PaperRecord, Result, ScholarSyncError};
use tracing::info;

use crate::AppContext;

/// Reads a JSON export of collected papers and pushes it into the literature
/// database, skipping entries that are already indexed.
pub async fn push_from_file(ctx: &AppContext, path: &Path) -> Result<PaperPushReport> {
    let service = ctx.papers.as_ref().ok_or_else(|| {
        ScholarSyncError::Config(
            "NOTION_PAPERS_DB is not set; the literature push is disabled".to_string(),
        )
    })?;

    let contents = std::fs::read_to_string(path).map_err(|err| {
        ScholarSyncError::Validation(format!("cannot read papers file {}: {err}", path.display()))
    })?;
    let papers: Vec<PaperRecord> = serde_json::from_str(&contents).map_err(|err| {
        ScholarSyncError::Validation(format!(
            "papers file {} is not a JSON array of papers: {err}",
            path.display()
        ))
    })?;

    info!(file = %path.display(), papers = papers.len(), "pushing literature batch");
    service.push(&papers).await
}

#[cfg(test)]
mod tests {
    use scholarsync_domain::{AppConfig, FolderConfig, NotionConfig, PaperConfig};

    use super::*;

    fn context(papers_database: Option<&str>, base_dir: &Path) -> AppContext {
        let mut notion = NotionConfig::new("secret-token".to_string(), "sched-db".to_string());
        notion.papers_database_id = papers_database.map(str::to_string);
        let config = AppConfig {
            notion,
            google: None,
            folders: FolderConfig { base_dir: base_dir.to_path_buf() },
            timezone: "Asia/Seoul".to_string(),
            papers: PaperConfig::default(),
        };
        AppContext::from_config(config).unwrap()
    }

    #[test]
    fn push_without_a_papers_database_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(None, dir.path());

        let result = tokio_test::block_on(push_from_file(&ctx, Path::new("unused.json")));
        assert!(matches!(result, Err(ScholarSyncError::Config(_))));
    }

    #[test]
    fn push_rejects_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Some("papers-db"), dir.path());

        let result = tokio_test::block_on(push_from_file(&ctx, &dir.path().join("absent.json")));
        assert!(matches!(result, Err(ScholarSyncError::Validation(_))));
    }

    #[test]
    fn push_rejects_a_file_that_is_not_a_paper_array() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(Some("papers-db"), dir.path());

        let export = dir.path().join("papers.json");
        std::fs::write(&export, "{ not json").unwrap();

        let result = tokio_test::block_on(push_from_file(&ctx, &export));
        assert!(matches!(result, Err(ScholarSyncError::Validation(_))));
    }
}
