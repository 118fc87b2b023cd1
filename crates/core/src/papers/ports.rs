//! Port interface for the literature database.

use std::collections::HashSet;

use async_trait::async_trait;
use scholarsync_domain::{InterestLevel, PaperRecord, Result};

/// Dedup keys of the records already in the literature database: DOI urls
/// and 50-character title prefixes, mixed in a single set. A paper matches
/// when either of its own keys is present.
#[derive(Debug, Clone, Default)]
pub struct ExistingKeys {
    keys: HashSet<String>,
}

impl ExistingKeys {
    /// Add one key. Empty strings are dropped; an empty DOI or title must
    /// never match another record's empty key.
    pub fn insert(&mut self, key: impl Into<String>) {
        let key = key.into();
        if !key.is_empty() {
            self.keys.insert(key);
        }
    }

    /// Record a freshly created paper so later duplicates in the same run
    /// are caught without re-querying.
    pub fn remember(&mut self, paper: &PaperRecord) {
        self.insert(paper.doi_url.clone());
        self.insert(paper.title_key());
    }

    pub fn matches(&self, paper: &PaperRecord) -> bool {
        self.keys.contains(&paper.doi_url) || self.keys.contains(&paper.title_key())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Classification attached to a paper at push time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperMeta {
    pub interest: InterestLevel,
    pub publication_type: String,
    pub categories: Vec<String>,
}

/// The literature database, write side plus the dedup key scan.
#[async_trait]
pub trait PaperIndex: Send + Sync {
    /// Collect the dedup keys of every record currently in the database.
    async fn existing_keys(&self) -> Result<ExistingKeys>;

    /// Create one literature record. Returns the new record's id.
    async fn create_paper(&self, paper: &PaperRecord, meta: &PaperMeta) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str, doi_url: &str) -> PaperRecord {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "doi_url": doi_url,
        }))
        .unwrap()
    }

    #[test]
    fn matches_on_either_key() {
        let mut keys = ExistingKeys::default();
        keys.insert("https://doi.org/10.1/abc");

        assert!(keys.matches(&paper("Some new title", "https://doi.org/10.1/abc")));
        assert!(!keys.matches(&paper("Some new title", "https://doi.org/10.1/xyz")));

        keys.insert(paper("Proximal junctional kyphosis after surgery", "").title_key());
        assert!(keys.matches(&paper("Proximal junctional kyphosis after surgery", "")));
    }

    #[test]
    fn empty_keys_never_match() {
        let mut keys = ExistingKeys::default();
        keys.insert("");
        assert!(keys.is_empty());
        assert!(!keys.matches(&paper("", "")));
    }

    #[test]
    fn remember_adds_both_keys() {
        let mut keys = ExistingKeys::default();
        let first = paper("A title", "https://doi.org/10.1/abc");
        keys.remember(&first);

        assert!(keys.matches(&paper("A title", "")));
        assert!(keys.matches(&paper("Different title", "https://doi.org/10.1/abc")));
        assert_eq!(keys.len(), 2);
    }
}
