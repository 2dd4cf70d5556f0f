use brain_core::tokenizer::{extract_keywords, extract_text, is_stopword};
use brain_core::Record;
use serde_json::json;

const SAMPLE: &str = "The quick brown fox and the lazy dog were running over the hill; \
    an API for widgets, gadgets & doohickeys: create, update, delete, list. \
    It is a REST endpoint at /v1/widgets with tags: inventory_mgmt, stock-levels.";

#[test]
fn it_drops_short_tokens_and_stopwords() {
    for limit in [1, 5, 20, 100] {
        for kw in extract_keywords(SAMPLE, limit) {
            assert!(kw.len() > 2, "short token {kw}");
            assert!(!is_stopword(&kw), "stopword {kw}");
        }
    }
}

#[test]
fn it_is_deterministic() {
    let a = extract_keywords(SAMPLE, 20);
    let b = extract_keywords(SAMPLE, 20);
    assert_eq!(a, b);
}

#[test]
fn it_lowercases_and_splits_on_word_chars() {
    let words = extract_keywords("Inventory_Mgmt stock-levels CAFÉ", 20);
    assert_eq!(words, vec!["inventory_mgmt", "stock", "levels", "caf"]);
}

#[test]
fn it_respects_the_limit() {
    let words = extract_keywords(SAMPLE, 4);
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy"]);
}

#[test]
fn it_reads_record_fields() {
    let rec = Record::from_value(json!({
        "name": "Widget API",
        "description": "Creates widgets",
        "tags": ["widget", "create"]
    }));
    let text = extract_text(&rec);
    assert_eq!(extract_keywords(&text, 20), vec!["widget", "api", "creates", "widgets", "create"]);
}
