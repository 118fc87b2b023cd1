//! Dedup-guarded push of fetched papers into the literature database.

use std::sync::Arc;
use std::time::Duration;

use scholarsync_domain::constants::NOTION_CREATE_GAP_MS;
use scholarsync_domain::{PaperConfig, PaperRecord, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::classify::{classify_categories, classify_interest, classify_publication_type};
use super::ports::{PaperIndex, PaperMeta};

/// Outcome counters for one push run. `success` means no create failed;
/// skips are the expected steady state, not failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperPushReport {
    pub success: bool,
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Pushes a batch of fetched papers, skipping records the database already
/// holds (by DOI url or 50-char title prefix) and classifying the rest.
pub struct PaperPushService {
    index: Arc<dyn PaperIndex>,
    config: PaperConfig,
    create_gap: Duration,
}

impl PaperPushService {
    pub fn new(index: Arc<dyn PaperIndex>, config: PaperConfig) -> Self {
        Self { index, config, create_gap: Duration::from_millis(NOTION_CREATE_GAP_MS) }
    }

    /// Override the pause between create attempts. Tests set zero.
    #[must_use]
    pub fn with_create_gap(mut self, gap: Duration) -> Self {
        self.create_gap = gap;
        self
    }

    /// Push one batch. The initial key scan must succeed; without it every
    /// record would be re-created on each run.
    #[instrument(skip(self, papers), fields(total = papers.len()))]
    pub async fn push(&self, papers: &[PaperRecord]) -> Result<PaperPushReport> {
        let mut existing = self.index.existing_keys().await?;
        info!(known = existing.len(), "existing dedup keys loaded");

        let mut created = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for paper in papers {
            if existing.matches(paper) {
                skipped += 1;
                continue;
            }

            let meta = PaperMeta {
                interest: classify_interest(paper, &self.config.interest_keywords),
                publication_type: classify_publication_type(paper),
                categories: classify_categories(paper, &self.config.category_rules),
            };

            match self.index.create_paper(paper, &meta).await {
                Ok(id) => {
                    created += 1;
                    existing.remember(paper);
                    info!(id = %id, interest = %meta.interest, "paper created");
                }
                Err(err) => {
                    failed += 1;
                    warn!(error = %err, title = %paper.title, "paper create failed");
                }
            }

            // The write API throttles; pace create attempts, never skips.
            if !self.create_gap.is_zero() {
                tokio::time::sleep(self.create_gap).await;
            }
        }

        info!(created, skipped, failed, "push run finished");
        Ok(PaperPushReport { success: failed == 0, total: papers.len(), created, skipped, failed })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use scholarsync_domain::{InterestKeywords, InterestLevel, ScholarSyncError};

    use super::super::ports::ExistingKeys;
    use super::*;

    fn paper(title: &str, doi_url: &str) -> PaperRecord {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "doi_url": doi_url,
            "pub_types": ["Journal Article"],
        }))
        .unwrap()
    }

    #[derive(Default)]
    struct FakeIndex {
        seeded: Vec<String>,
        fail_scan: bool,
        fail_titles: HashSet<String>,
        created: Mutex<Vec<(String, PaperMeta)>>,
    }

    #[async_trait]
    impl PaperIndex for FakeIndex {
        async fn existing_keys(&self) -> Result<ExistingKeys> {
            if self.fail_scan {
                return Err(ScholarSyncError::Backend("query refused".to_string()));
            }
            let mut keys = ExistingKeys::default();
            for key in &self.seeded {
                keys.insert(key.clone());
            }
            Ok(keys)
        }

        async fn create_paper(&self, paper: &PaperRecord, meta: &PaperMeta) -> Result<String> {
            if self.fail_titles.contains(&paper.title) {
                return Err(ScholarSyncError::Backend("429 rate limited".to_string()));
            }
            let mut created = self.created.lock().unwrap();
            created.push((paper.title.clone(), meta.clone()));
            Ok(format!("page-{}", created.len()))
        }
    }

    fn service(index: Arc<FakeIndex>, config: PaperConfig) -> PaperPushService {
        PaperPushService::new(index, config).with_create_gap(Duration::ZERO)
    }

    #[tokio::test]
    async fn push_skips_papers_already_in_the_database() {
        let index = Arc::new(FakeIndex {
            seeded: vec!["https://doi.org/10.1/known".to_string()],
            ..FakeIndex::default()
        });
        let svc = service(index.clone(), PaperConfig::default());

        let batch =
            [paper("Known paper", "https://doi.org/10.1/known"), paper("New paper", "")];
        let report = svc.push(&batch).await.unwrap();

        assert_eq!(
            report,
            PaperPushReport { success: true, total: 2, created: 1, skipped: 1, failed: 0 }
        );
        let created = index.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].0, "New paper");
    }

    #[tokio::test]
    async fn push_deduplicates_within_a_single_batch() {
        let index = Arc::new(FakeIndex::default());
        let svc = service(index.clone(), PaperConfig::default());

        let batch = [
            paper("Same study", "https://doi.org/10.1/one"),
            paper("Same study reprinted", "https://doi.org/10.1/one"),
        ];
        let report = svc.push(&batch).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn push_deduplicates_by_title_prefix() {
        let long_title = "a".repeat(60);
        let prefix: String = long_title.chars().take(50).collect();
        let index = Arc::new(FakeIndex { seeded: vec![prefix], ..FakeIndex::default() });
        let svc = service(index, PaperConfig::default());

        let report = svc.push(&[paper(&long_title, "")]).await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.created, 0);
    }

    #[tokio::test]
    async fn push_counts_failures_and_keeps_going() {
        let index = Arc::new(FakeIndex {
            fail_titles: HashSet::from(["Doomed".to_string()]),
            ..FakeIndex::default()
        });
        let svc = service(index.clone(), PaperConfig::default());

        let batch = [paper("Doomed", ""), paper("Fine", "")];
        let report = svc.push(&batch).await.unwrap();

        assert!(!report.success);
        assert_eq!(report.failed, 1);
        assert_eq!(report.created, 1);
        assert_eq!(index.created.lock().unwrap()[0].0, "Fine");
    }

    #[tokio::test]
    async fn push_propagates_a_failed_key_scan() {
        let index = Arc::new(FakeIndex { fail_scan: true, ..FakeIndex::default() });
        let svc = service(index, PaperConfig::default());

        let err = svc.push(&[paper("Any", "")]).await.unwrap_err();
        assert!(matches!(err, ScholarSyncError::Backend(_)));
    }

    #[tokio::test]
    async fn push_attaches_classification_to_each_create() {
        let index = Arc::new(FakeIndex::default());
        let config = PaperConfig {
            interest_keywords: InterestKeywords {
                must_read: vec!["kyphosis".to_string()],
                interested: Vec::new(),
            },
            category_rules: Vec::new(),
        };
        let svc = service(index.clone(), config);

        let batch: [PaperRecord; 1] = [serde_json::from_value(serde_json::json!({
            "title": "Proximal junctional kyphosis outcomes",
            "pub_types": ["Systematic Review"],
        }))
        .unwrap()];
        svc.push(&batch).await.unwrap();

        let created = index.created.lock().unwrap();
        let meta = &created[0].1;
        assert_eq!(meta.interest, InterestLevel::MustRead);
        assert_eq!(meta.publication_type, "Systematic Review");
        assert_eq!(meta.categories, vec!["Review"]);
    }

    #[tokio::test]
    async fn push_of_an_empty_batch_reports_success() {
        let index = Arc::new(FakeIndex::default());
        let svc = service(index, PaperConfig::default());

        let report = svc.push(&[]).await.unwrap();
        assert_eq!(
            report,
            PaperPushReport { success: true, total: 0, created: 0, skipped: 0, failed: 0 }
        );
    }
}
