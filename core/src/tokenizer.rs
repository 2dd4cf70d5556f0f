use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::record::Record;

/// Record fields that contribute to indexed text, in concatenation order.
pub const TEXT_FIELDS: [&str; 15] = [
    "name", "title", "description", "summary", "body", "content", "definition", "examples",
    "tags", "keywords", "group", "domain", "category", "path", "endpoint",
];

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-z0-9_]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the","and","for","are","but","not","you","all","any","can","had","her","was","one","our","out",
            "has","have","him","his","how","its","may","new","now","old","see","two","who","did","get","let",
            "put","say","she","too","use","via","with","this","that","from","they","will","would","there",
            "their","what","about","which","when","make","like","into","than","them","been","were","also",
            "more","some","such","only","other","then","these","those","each","over","your","just","should",
            "could","where","while","does","being","here","very","both","after","before"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Concatenate the record's text fields, in [`TEXT_FIELDS`] order, with single spaces.
pub fn extract_text(record: &Record) -> String {
    TEXT_FIELDS
        .iter()
        .filter_map(|field| record.field_text(field))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, split on ASCII word characters and drop short tokens and
/// stopwords. Returns the first `limit` distinct survivors in order of first
/// appearance; this is a prefix, not a frequency ranking.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keywords = Vec::new();
    for mat in RE.find_iter(&lowered) {
        if keywords.len() >= limit { break; }
        let token = mat.as_str();
        if token.len() <= 2 || is_stopword(token) { continue; }
        if seen.insert(token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_extract() {
        let k = extract_keywords("Creates widgets for the Widget API", 20);
        assert_eq!(k, vec!["creates", "widgets", "widget", "api"]);
    }

    #[test]
    fn truncates_to_first_survivors() {
        // "zeta" appears most often but after the cut-off.
        let k = extract_keywords("alpha beta gamma delta zeta zeta zeta zeta", 3);
        assert_eq!(k, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn zero_limit_yields_nothing() {
        assert!(extract_keywords("widget", 0).is_empty());
    }

    #[test]
    fn text_follows_field_priority() {
        let rec = Record::from_value(json!({
            "endpoint": "/widgets",
            "tags": ["widget", "create"],
            "name": "Widget API",
            "description": "Creates widgets",
            "unrelated": "ignored"
        }));
        assert_eq!(extract_text(&rec), "Widget API Creates widgets widget create /widgets");
    }
}
