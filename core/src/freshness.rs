use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

use crate::category::Category;
use crate::config::BrainConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreshnessReport {
    /// AND over the categories whose directory exists.
    pub fresh: bool,
    pub per_category: BTreeMap<Category, bool>,
    /// Categories with no directory; they are left out of `fresh`.
    pub missing: Vec<Category>,
}

/// Compare each category directory's mtime against `max_age`. Does not
/// trigger a rebuild; callers decide what to do with the answer.
pub fn check_freshness(config: &BrainConfig, max_age: Duration) -> FreshnessReport {
    check_freshness_at(config, max_age, SystemTime::now())
}

pub fn check_freshness_at(config: &BrainConfig, max_age: Duration, now: SystemTime) -> FreshnessReport {
    let mut per_category = BTreeMap::new();
    let mut missing = Vec::new();
    for category in Category::ALL {
        let dir = config.category_dir(category);
        let modified = match std::fs::metadata(&dir).and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "category directory unavailable");
                missing.push(category);
                continue;
            }
        };
        // mtimes in the future count as age zero
        let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
        per_category.insert(category, age <= max_age);
    }
    let fresh = per_category.values().all(|f| *f);
    FreshnessReport { fresh, per_category, missing }
}
