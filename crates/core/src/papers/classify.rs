//! Keyword classification of fetched papers.
//!
//! Every rule runs over a lowercased haystack of title, abstract, keywords
//! and MeSH terms. Publication types are matched by substring, so feed
//! variants like "Review, Systematic" still hit their rung.

use scholarsync_domain::{CategoryRule, InterestKeywords, InterestLevel, PaperRecord};

/// Publication types that cap the interest at 참고 regardless of keywords.
const LOW_PRIORITY_TYPES: &[&str] =
    &["letter", "comment", "erratum", "published erratum", "editorial"];

/// Publication-type ladder, highest priority first. The first rung with a
/// matching needle names the type; nothing matches means a plain study.
const TYPE_LADDER: &[(&[&str], &str)] = &[
    (&["randomized controlled trial"], "RCT"),
    (&["meta-analysis"], "Meta-analysis"),
    (&["systematic review"], "Systematic Review"),
    (&["review"], "Review"),
    (&["editorial"], "Editorial"),
    (&["letter"], "Letter to Editor"),
    (&["comment"], "Letter to Editor"),
    (&["published erratum", "erratum"], "Erratum"),
    (&["case reports"], "Case Report"),
    (&["observational"], "Observational Study"),
    (&["comparative study"], "Comparative Study"),
    (&["multicenter study"], "Multicenter Study"),
    (&["validation study"], "Validation Study"),
    (&["historical article"], "Historical Article"),
];

const DEFAULT_PUBLICATION_TYPE: &str = "Clinical Study";

fn lowered_types(paper: &PaperRecord) -> Vec<String> {
    paper.pub_types.iter().map(|pt| pt.to_lowercase()).collect()
}

fn any_type_contains(types: &[String], needle: &str) -> bool {
    types.iter().any(|pt| pt.contains(needle))
}

/// 관심도 for one paper.
///
/// Low-priority publication types win outright; then a single must-read
/// keyword, then the interested-keyword count (two or more reads as
/// must-read, exactly one as interested).
pub fn classify_interest(paper: &PaperRecord, keywords: &InterestKeywords) -> InterestLevel {
    let types = lowered_types(paper);
    if LOW_PRIORITY_TYPES.iter().any(|lpt| any_type_contains(&types, lpt)) {
        return InterestLevel::Reference;
    }

    let text = paper.classification_text();
    if keywords.must_read.iter().any(|kw| text.contains(&kw.to_lowercase())) {
        return InterestLevel::MustRead;
    }

    let matched = keywords
        .interested
        .iter()
        .filter(|kw| text.contains(&kw.to_lowercase()))
        .count();
    match matched {
        0 => InterestLevel::Reference,
        1 => InterestLevel::Interested,
        _ => InterestLevel::MustRead,
    }
}

/// Single publication-type label for the Type select property.
pub fn classify_publication_type(paper: &PaperRecord) -> String {
    let types = lowered_types(paper);
    for (needles, label) in TYPE_LADDER {
        if needles.iter().any(|needle| any_type_contains(&types, needle)) {
            return (*label).to_string();
        }
    }
    DEFAULT_PUBLICATION_TYPE.to_string()
}

/// Category labels: configured keyword rules first (in rule order), then
/// the publication-type derived categories, deduplicated.
pub fn classify_categories(paper: &PaperRecord, rules: &[CategoryRule]) -> Vec<String> {
    let text = paper.classification_text();
    let mut categories: Vec<String> = Vec::new();

    for rule in rules {
        if rule.keywords.iter().any(|kw| text.contains(&kw.to_lowercase())) {
            categories.push(rule.category.clone());
        }
    }

    let types = lowered_types(paper);
    for (needle, label) in
        [("review", "Review"), ("meta-analysis", "Meta-analysis"), ("randomized", "RCT")]
    {
        if any_type_contains(&types, needle) && !categories.iter().any(|c| c == label) {
            categories.push(label.to_string());
        }
    }

    categories
}
