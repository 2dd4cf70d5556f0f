use std::path::{Path, PathBuf};

use crate::category::Category;

pub const DATA_DIR_ENV: &str = "BRAIN_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "./data/brain";

/// Extensions picked up by the scanner. `cbor` and `bin` files are listed but
/// only ever parsed as JSON text; there is no binary decoder.
pub const ELIGIBLE_EXTENSIONS: [&str; 3] = ["json", "cbor", "bin"];

/// Keywords kept per record during indexing.
pub const RECORD_KEYWORD_LIMIT: usize = 20;
/// Keywords kept from a free-text query.
pub const QUERY_KEYWORD_LIMIT: usize = 10;
/// Per-category result cap for the fallback scan.
pub const DEFAULT_FALLBACK_LIMIT: usize = 20;

#[derive(Debug, Clone)]
pub struct BrainConfig {
    pub root: PathBuf,
}

impl BrainConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Root from `BRAIN_DATA_DIR`, falling back to `./data/brain`.
    pub fn from_env() -> Self {
        let root = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        Self::new(root)
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_dirs_hang_off_root() {
        let cfg = BrainConfig::new("/srv/brain");
        assert_eq!(cfg.category_dir(Category::Apis), PathBuf::from("/srv/brain/apis"));
        assert_eq!(cfg.category_dir(Category::Concepts), PathBuf::from("/srv/brain/concepts"));
    }
}
