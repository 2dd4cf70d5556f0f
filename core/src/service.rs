//! The index service: owns the current snapshot and answers queries.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

use crate::category::Category;
use crate::config::BrainConfig;
use crate::error::{validate_query, Result};
use crate::fallback::{self, FallbackLimits, FullScan};
use crate::freshness::{self, FreshnessReport};
use crate::index::{build_snapshot, IndexSnapshot, IndexStats, RebuildReport};
use crate::search::{self, IndexedSearch, KeywordLookup, SearchResult};

/// Index over one corpus root.
///
/// Readers clone an `Arc` to the published snapshot and never block on a
/// rebuild in progress. A rebuild builds a fresh snapshot without holding the
/// read lock and publishes it with a single swap, so searches see either the
/// old index or the new one, never a half-filled one.
pub struct BrainIndex {
    config: BrainConfig,
    current: RwLock<Arc<IndexSnapshot>>,
    rebuild_lock: Mutex<()>,
}

impl BrainIndex {
    pub fn new(config: BrainConfig) -> Self {
        Self {
            config,
            current: RwLock::new(Arc::new(IndexSnapshot::empty())),
            rebuild_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &BrainConfig { &self.config }

    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.current.read().ready
    }

    /// Rebuild from disk and publish the result. Concurrent rebuilds run one
    /// after another.
    pub fn rebuild(&self) -> RebuildReport {
        let _guard = self.rebuild_lock.lock();
        self.rebuild_locked()
    }

    fn rebuild_locked(&self) -> RebuildReport {
        let (mut snapshot, report) = build_snapshot(&self.config);
        snapshot.generation = self.current.read().generation + 1;
        let old = std::mem::replace(&mut *self.current.write(), Arc::new(snapshot));
        // the previous snapshot is freed outside the write lock
        drop(old);
        report
    }

    /// Current snapshot, rebuilding first if nothing has been built yet.
    fn ready_snapshot(&self) -> Arc<IndexSnapshot> {
        let snap = self.snapshot();
        if snap.ready {
            return snap;
        }
        let _guard = self.rebuild_lock.lock();
        // another caller may have finished while we waited
        let snap = self.snapshot();
        if snap.ready {
            return snap;
        }
        tracing::info!("index not ready, rebuilding before query");
        self.rebuild_locked();
        self.snapshot()
    }

    /// Does not trigger a rebuild; `ready` reports whether one has happened.
    pub fn stats(&self) -> IndexStats {
        self.snapshot().stats()
    }

    pub fn search_single_keyword(&self, keyword: &str, category: Option<Category>) -> Vec<KeywordLookup> {
        search::search_single_keyword(&self.ready_snapshot(), keyword, category)
    }

    pub fn search_multi_keyword(&self, keywords: &[String], category: Option<Category>) -> Vec<SearchResult> {
        search::search_multi_keyword(&self.ready_snapshot(), keywords, category)
    }

    pub fn search_by_free_text(&self, query: &str, category: Option<Category>) -> IndexedSearch {
        search::search_by_free_text(&self.ready_snapshot(), query, category)
    }

    /// Free-text search that rejects blank queries.
    pub fn search_indexed(&self, query: &str, category: Option<Category>) -> Result<IndexedSearch> {
        let query = validate_query(query)?;
        Ok(self.search_by_free_text(query, category))
    }

    /// Fallback scan straight over the files on disk.
    pub fn search_full(&self, query: &str, limits: FallbackLimits) -> Result<FullScan> {
        let query = validate_query(query)?;
        Ok(fallback::search_full(&self.config, query, limits))
    }

    pub fn check_freshness(&self, max_age: Duration) -> FreshnessReport {
        freshness::check_freshness(&self.config, max_age)
    }
}
