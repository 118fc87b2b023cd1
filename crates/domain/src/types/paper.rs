//! Literature record types, decoded from journal-alert JSON exports.

use serde::{Deserialize, Serialize};

use crate::constants::TITLE_DEDUP_PREFIX_CHARS;
use crate::utils::text::truncate_chars;

/// One fetched article, field names matching the collector's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub pmid: String,
    pub title: String,
    /// Pre-formatted author line ("Lee J, Kim S, et al.").
    #[serde(default)]
    pub authors: String,
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub doi_url: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub journal_abbr: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub pages: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, as PubMed supplied it.
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub mesh_terms: Vec<String>,
    #[serde(default)]
    pub pub_types: Vec<String>,
    #[serde(default)]
    pub pubmed_url: String,
    #[serde(default)]
    pub affiliation: String,
    /// Korean summary attached by an upstream model run, if any.
    #[serde(default)]
    pub summary_ko: Option<String>,
    /// Korean full-text translation attached upstream, if any.
    #[serde(default)]
    pub translation_ko: Option<String>,
}

impl PaperRecord {
    /// Title-prefix key used for duplicate detection.
    pub fn title_key(&self) -> String {
        truncate_chars(self.title.trim(), TITLE_DEDUP_PREFIX_CHARS).to_string()
    }

    /// Journal label for the select property, abbreviation preferred.
    pub fn display_journal(&self) -> &str {
        if self.journal_abbr.is_empty() { &self.journal } else { &self.journal_abbr }
    }

    /// Lowercased haystack for keyword classification: title, abstract,
    /// keywords and MeSH terms joined.
    pub fn classification_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.abstract_text,
            self.keywords.join(" "),
            self.mesh_terms.join(" ")
        )
        .to_lowercase()
    }
}

/// 관심도 levels pushed to the literature database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestLevel {
    MustRead,
    Interested,
    Reference,
}

impl InterestLevel {
    /// Select-property label, exactly as stored.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MustRead => "🔴 필독",
            Self::Interested => "🟡 관심",
            Self::Reference => "⚪ 참고",
        }
    }
}

impl std::fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_collector_json() {
        let raw = serde_json::json!({
            "pmid": "41234567",
            "title": "Proximal junctional kyphosis after adult spinal deformity surgery",
            "authors": "Lee J, Kim S, et al.",
            "abstract": "BACKGROUND: ...",
            "doi": "10.1000/spine.2026.001",
            "doi_url": "https://doi.org/10.1000/spine.2026.001",
            "journal": "Spine Journal",
            "journal_abbr": "Spine J",
            "volume": "26",
            "issue": "3",
            "pub_date": "2026-03",
            "keywords": ["spinal deformity", "PJK"],
            "mesh_terms": ["Kyphosis"],
            "pub_types": ["Journal Article"],
            "pubmed_url": "https://pubmed.ncbi.nlm.nih.gov/41234567/"
        });
        let paper: PaperRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(paper.display_journal(), "Spine J");
        assert!(paper.classification_text().contains("pjk"));
        assert!(paper.summary_ko.is_none());
    }

    #[test]
    fn title_key_is_a_50_char_prefix() {
        let paper = PaperRecord {
            title: "x".repeat(80),
            ..serde_json::from_value(serde_json::json!({"title": ""})).unwrap()
        };
        assert_eq!(paper.title_key().chars().count(), 50);
    }

    #[test]
    fn interest_labels_match_database_values() {
        assert_eq!(InterestLevel::MustRead.label(), "🔴 필독");
        assert_eq!(InterestLevel::Interested.label(), "🟡 관심");
        assert_eq!(InterestLevel::Reference.label(), "⚪ 참고");
    }
}
