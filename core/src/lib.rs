//! In-memory keyword index and search over the brain corpus.
//!
//! The corpus is a directory of category folders (`apis`, `docs`, `concepts`)
//! holding JSON record files. Files are scanned, parsed into records, reduced
//! to keywords and folded into per-category posting lists. Nothing is
//! persisted: the files on disk are the only source of truth.

pub mod category;
pub mod config;
pub mod error;
pub mod fallback;
pub mod freshness;
pub mod index;
pub mod record;
pub mod scanner;
pub mod search;
pub mod service;
pub mod tokenizer;

pub use category::Category;
pub use config::BrainConfig;
pub use error::{BrainError, Result};
pub use fallback::{FallbackLimits, FullScan};
pub use freshness::FreshnessReport;
pub use index::{CategoryIndex, IndexSnapshot, IndexStats, RebuildReport, SourceFile};
pub use record::Record;
pub use search::{IndexedSearch, KeywordLookup, SearchResult, SearchStatus};
pub use service::BrainIndex;
