use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ELIGIBLE_EXTENSIONS;
use crate::error::BrainError;

/// Whether the scanner picks up a file with this path.
pub fn is_eligible(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ELIGIBLE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Eligible files directly inside `dir`, sorted by file name. A missing
/// directory is logged and yields an empty listing.
pub fn list_eligible_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        let err = BrainError::DirectoryNotFound(dir.to_path_buf());
        tracing::warn!(error = %err, "skipping category");
        return Vec::new();
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "unreadable directory entry");
                continue;
            }
        };
        let p = entry.path();
        if entry.file_type().is_file() && is_eligible(p) {
            files.push(p.to_path_buf());
        }
    }
    files
}

/// File name used to identify a file within its category.
pub fn file_key(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_only_eligible_extensions_in_name_order() {
        let dir = tempdir().unwrap();
        for name in ["b.json", "a.cbor", "c.bin", "notes.txt", "d.JSON"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();
        let names: Vec<String> = list_eligible_files(dir.path()).iter().map(|p| file_key(p)).collect();
        assert_eq!(names, vec!["a.cbor", "b.json", "c.bin", "d.JSON"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        assert!(list_eligible_files(&dir.path().join("nope")).is_empty());
    }
}
