//! Ranked lookups against an [`IndexSnapshot`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::category::Category;
use crate::config::QUERY_KEYWORD_LIMIT;
use crate::index::IndexSnapshot;
use crate::tokenizer::extract_keywords;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordLookup {
    pub category: Category,
    pub keyword: String,
    pub matched_file_count: usize,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub category: Category,
    pub file: String,
    pub match_count: usize,
    /// Percentage of query keywords this file matched.
    pub relevance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Matched,
    NoMatches,
    NoKeywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedSearch {
    pub results: Vec<SearchResult>,
    pub keywords_extracted: Vec<String>,
    pub status: SearchStatus,
}

fn normalize(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

/// Posting list of one keyword in each targeted category. Absent keywords
/// give an empty file list, not an error.
pub fn search_single_keyword(snapshot: &IndexSnapshot, keyword: &str, category: Option<Category>) -> Vec<KeywordLookup> {
    let keyword = normalize(keyword);
    Category::targets(category)
        .into_iter()
        .map(|cat| {
            let files: Vec<String> = snapshot
                .category(cat)
                .and_then(|idx| idx.files_for(&keyword))
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            KeywordLookup { category: cat, keyword: keyword.clone(), matched_file_count: files.len(), files }
        })
        .collect()
}

/// Count, per (category, file), how many of the keywords hit it. Results are
/// sorted by match count descending; ties keep first-hit order, so the same
/// query always ranks the same way.
pub fn search_multi_keyword(snapshot: &IndexSnapshot, keywords: &[String], category: Option<Category>) -> Vec<SearchResult> {
    let mut terms: Vec<String> = Vec::with_capacity(keywords.len());
    for k in keywords {
        let k = normalize(k);
        if !k.is_empty() && !terms.contains(&k) {
            terms.push(k);
        }
    }
    if terms.is_empty() {
        return Vec::new();
    }

    let targets = Category::targets(category);
    let mut slots: HashMap<(Category, String), usize> = HashMap::new();
    let mut results: Vec<SearchResult> = Vec::new();
    for term in &terms {
        for cat in &targets {
            let Some(files) = snapshot.category(*cat).and_then(|idx| idx.files_for(term)) else { continue };
            for file in files {
                let slot = *slots.entry((*cat, file.clone())).or_insert_with(|| {
                    results.push(SearchResult { category: *cat, file: file.clone(), match_count: 0, relevance: 0.0 });
                    results.len() - 1
                });
                results[slot].match_count += 1;
            }
        }
    }

    let total = terms.len() as f64;
    for r in results.iter_mut() {
        r.relevance = r.match_count as f64 / total * 100.0;
    }
    // sort_by is stable
    results.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    results
}

/// Extract up to ten keywords from `query` and rank files by them.
pub fn search_by_free_text(snapshot: &IndexSnapshot, query: &str, category: Option<Category>) -> IndexedSearch {
    let keywords = extract_keywords(query, QUERY_KEYWORD_LIMIT);
    if keywords.is_empty() {
        return IndexedSearch { results: Vec::new(), keywords_extracted: keywords, status: SearchStatus::NoKeywords };
    }
    let results = search_multi_keyword(snapshot, &keywords, category);
    let status = if results.is_empty() { SearchStatus::NoMatches } else { SearchStatus::Matched };
    IndexedSearch { results, keywords_extracted: keywords, status }
}
