//! Linear substring scan over parsed records, bypassing the index.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::category::Category;
use crate::config::{BrainConfig, DEFAULT_FALLBACK_LIMIT};
use crate::record::{parse_file_lenient, Record, SOURCE_FIELD};
use crate::scanner::{file_key, list_eligible_files};

/// Fields tested for each category. `content` is included so raw-text
/// pseudo-records can match.
pub fn search_fields(category: Category) -> &'static [&'static str] {
    match category {
        Category::Apis => &["name", "description", "group", "tags", "path", "endpoint", "content"],
        Category::Docs => &["title", "name", "summary", "description", "body", "content", "tags"],
        Category::Concepts => &["name", "title", "definition", "description", "examples", "tags", "content"],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackLimits {
    pub apis: usize,
    pub docs: usize,
    pub concepts: usize,
}

impl Default for FallbackLimits {
    fn default() -> Self {
        Self::uniform(DEFAULT_FALLBACK_LIMIT)
    }
}

impl FallbackLimits {
    pub fn uniform(limit: usize) -> Self {
        Self { apis: limit, docs: limit, concepts: limit }
    }

    pub fn for_category(&self, category: Category) -> usize {
        match category {
            Category::Apis => self.apis,
            Category::Docs => self.docs,
            Category::Concepts => self.concepts,
        }
    }
}

/// Matches per category, each record annotated with `_source`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FullScan {
    pub apis: Vec<Value>,
    pub docs: Vec<Value>,
    pub concepts: Vec<Value>,
}

impl FullScan {
    pub fn total(&self) -> usize {
        self.apis.len() + self.docs.len() + self.concepts.len()
    }

    fn slot(&mut self, category: Category) -> &mut Vec<Value> {
        match category {
            Category::Apis => &mut self.apis,
            Category::Docs => &mut self.docs,
            Category::Concepts => &mut self.concepts,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScan {
    pub matches: Vec<Value>,
    pub files_scanned: usize,
}

/// Case-insensitive containment of `needle` (already lowercased) in any of
/// the category's fields.
pub fn record_matches(record: &Record, category: Category, needle: &str) -> bool {
    search_fields(category)
        .iter()
        .filter_map(|f| record.field_text(f))
        .any(|text| text.to_lowercase().contains(needle))
}

/// Scan one category directory in listing order and stop at `limit` matches.
/// The result is the first N records encountered, not the N best.
pub fn scan_category(dir: &Path, category: Category, query: &str, limit: usize) -> CategoryScan {
    let needle = query.to_lowercase();
    let mut scan = CategoryScan::default();
    if limit == 0 {
        return scan;
    }
    for path in list_eligible_files(dir) {
        let records = match parse_file_lenient(&path) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "skipping file in fallback scan");
                continue;
            }
        };
        scan.files_scanned += 1;
        let source = file_key(&path);
        for mut record in records {
            if !record_matches(&record, category, &needle) {
                continue;
            }
            record.insert(SOURCE_FIELD, Value::String(source.clone()));
            scan.matches.push(record.into_value());
            if scan.matches.len() >= limit {
                return scan;
            }
        }
    }
    scan
}

pub fn search_full(config: &BrainConfig, query: &str, limits: FallbackLimits) -> FullScan {
    let mut out = FullScan::default();
    for category in Category::ALL {
        let scan = scan_category(&config.category_dir(category), category, query, limits.for_category(category));
        tracing::debug!(%category, matches = scan.matches.len(), files_scanned = scan.files_scanned, "fallback scan");
        *out.slot(category) = scan.matches;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn matches_on_category_fields_only() {
        let rec = Record::from_value(json!({"name": "Billing", "owner": "payments team"}));
        assert!(record_matches(&rec, Category::Apis, "bill"));
        assert!(!record_matches(&rec, Category::Apis, "payments"));
    }

    #[test]
    fn array_fields_are_joined() {
        let rec = Record::from_value(json!({"tags": ["rate", "limit"]}));
        assert!(record_matches(&rec, Category::Concepts, "rate limit"));
    }

    #[test]
    fn raw_text_records_match_content() {
        let rec = Record::raw_text("Plain NOTES about caching");
        assert!(record_matches(&rec, Category::Docs, "caching"));
    }
}
