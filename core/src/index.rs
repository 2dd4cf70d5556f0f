use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::category::Category;
use crate::config::{BrainConfig, RECORD_KEYWORD_LIMIT};
use crate::record::parse_file;
use crate::scanner::{file_key, list_eligible_files};
use crate::tokenizer::{extract_keywords, extract_text};

/// Metadata for one indexed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub category: Category,
    pub size_bytes: u64,
    pub record_count: usize,
    pub indexed_at: String,
    /// `id`/`name`/`title` of each record, for tracing results back. Not used in ranking.
    pub record_ids: Vec<String>,
}

/// Posting lists and file metadata for a single category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    /// keyword -> file keys containing it
    pub postings: HashMap<String, BTreeSet<String>>,
    pub files: HashMap<String, SourceFile>,
    /// File keys in indexing order.
    pub order: Vec<String>,
}

impl CategoryIndex {
    pub fn new() -> Self { Self::default() }

    pub fn files_for(&self, keyword: &str) -> Option<&BTreeSet<String>> {
        self.postings.get(keyword)
    }

    pub fn keyword_count(&self) -> usize { self.postings.len() }

    pub fn total_records(&self) -> usize {
        self.files.values().map(|f| f.record_count).sum()
    }

    /// Parse `path` and fold its keywords into the posting lists. Returns
    /// false when the file cannot be read or parsed; the index is left as it was.
    pub fn index_file(&mut self, path: &Path, category: Category) -> bool {
        let records = match parse_file(path) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(error = %err, "skipping file");
                return false;
            }
        };
        let key = file_key(path);
        let mut record_ids = Vec::new();
        for record in &records {
            let text = extract_text(record);
            for keyword in extract_keywords(&text, RECORD_KEYWORD_LIMIT) {
                self.postings.entry(keyword).or_default().insert(key.clone());
            }
            if let Some(id) = record.identifier() {
                record_ids.push(id);
            }
        }
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let meta = SourceFile {
            path: path.to_path_buf(),
            category,
            size_bytes,
            record_count: records.len(),
            indexed_at: now_rfc3339(),
            record_ids,
        };
        tracing::debug!(file = %key, %category, records = meta.record_count, "indexed file");
        if self.files.insert(key.clone(), meta).is_none() {
            self.order.push(key);
        }
        true
    }
}

/// A complete, immutable view of the index. Rebuilds produce a new snapshot
/// rather than editing the published one.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    pub categories: BTreeMap<Category, CategoryIndex>,
    pub ready: bool,
    pub last_rebuild: Option<String>,
    /// Number of publishes before this one; bumped by the owning service.
    pub generation: u64,
}

impl IndexSnapshot {
    /// Empty and not ready.
    pub fn empty() -> Self {
        let categories = Category::ALL.iter().map(|c| (*c, CategoryIndex::new())).collect();
        Self { categories, ready: false, last_rebuild: None, generation: 0 }
    }

    pub fn category(&self, category: Category) -> Option<&CategoryIndex> {
        self.categories.get(&category)
    }

    /// Distinct keywords across all categories.
    pub fn unique_keywords(&self) -> usize {
        let mut all: HashSet<&str> = HashSet::new();
        for idx in self.categories.values() {
            all.extend(idx.postings.keys().map(String::as_str));
        }
        all.len()
    }

    pub fn stats(&self) -> IndexStats {
        let per_category = self
            .categories
            .iter()
            .map(|(cat, idx)| {
                let stats = CategoryStats {
                    file_count: idx.files.len(),
                    keyword_count: idx.keyword_count(),
                    total_records: idx.total_records(),
                    files: idx.order.clone(),
                };
                (*cat, stats)
            })
            .collect();
        IndexStats { ready: self.ready, last_rebuild: self.last_rebuild.clone(), per_category }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebuildReport {
    pub files_indexed: usize,
    pub files_total: usize,
    pub unique_keywords: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub file_count: usize,
    pub keyword_count: usize,
    pub total_records: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub ready: bool,
    pub last_rebuild: Option<String>,
    pub per_category: BTreeMap<Category, CategoryStats>,
}

/// Scan every category directory and index each eligible file in listing
/// order. Always completes; unreadable directories and bad files only lower
/// the counts.
pub fn build_snapshot(config: &BrainConfig) -> (IndexSnapshot, RebuildReport) {
    let start = Instant::now();
    let mut snapshot = IndexSnapshot::empty();
    let mut files_total = 0usize;
    let mut files_indexed = 0usize;

    for category in Category::ALL {
        let dir = config.category_dir(category);
        let files = list_eligible_files(&dir);
        files_total += files.len();
        let idx = snapshot.categories.entry(category).or_default();
        for file in files {
            if idx.index_file(&file, category) {
                files_indexed += 1;
            }
        }
    }

    snapshot.ready = true;
    snapshot.last_rebuild = Some(now_rfc3339());
    let report = RebuildReport {
        files_indexed,
        files_total,
        unique_keywords: snapshot.unique_keywords(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    };
    tracing::info!(
        files_indexed = report.files_indexed,
        files_total = report.files_total,
        unique_keywords = report.unique_keywords,
        elapsed_ms = report.elapsed_ms,
        "brain index rebuilt"
    );
    (snapshot, report)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn index_file_records_postings_and_ids() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widgets.json");
        fs::write(&path, r#"[{"id":"w1","name":"Widget API"},{"title":"Widget Guide"}]"#).unwrap();

        let mut idx = CategoryIndex::new();
        assert!(idx.index_file(&path, Category::Apis));
        let files = idx.files_for("widget").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files.contains("widgets.json"));
        let meta = &idx.files["widgets.json"];
        assert_eq!(meta.record_count, 2);
        assert_eq!(meta.record_ids, vec!["w1", "Widget Guide"]);
        assert!(meta.size_bytes > 0);
    }

    #[test]
    fn unparsable_file_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{oops").unwrap();

        let mut idx = CategoryIndex::new();
        assert!(!idx.index_file(&path, Category::Docs));
        assert!(idx.files.is_empty());
        assert!(idx.postings.is_empty());
    }

    #[test]
    fn every_posting_references_known_file() {
        let dir = tempdir().unwrap();
        let apis = dir.path().join("apis");
        fs::create_dir_all(&apis).unwrap();
        fs::write(apis.join("a.json"), r#"{"name":"alpha service"}"#).unwrap();
        fs::write(apis.join("b.json"), r#"{"name":"beta service"}"#).unwrap();

        let (snapshot, report) = build_snapshot(&BrainConfig::new(dir.path()));
        assert_eq!(report.files_indexed, 2);
        for idx in snapshot.categories.values() {
            for files in idx.postings.values() {
                assert!(files.iter().all(|f| idx.files.contains_key(f)));
            }
        }
    }
}
