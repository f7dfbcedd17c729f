//! Scratch directories and files for tests that touch the filesystem.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Fresh temporary directory, removed when dropped.
pub fn temp_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Writes `contents` to `dir/name` and returns the path.
///
/// `name` may contain subdirectories; they are created as needed.
pub fn write_test_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create test directory");
    }
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Temporary input tree with empty `profiles/`, `ssh/` and `sst/`
/// directories.
pub fn input_tree() -> TempDir {
    let root = temp_test_dir();
    for sub in ["profiles", "ssh", "sst"] {
        std::fs::create_dir(root.path().join(sub)).expect("Failed to create input directory");
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_nested_file() {
        let dir = temp_test_dir();
        let path = write_test_file(dir.path(), "nested/argo.txt", "**\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "**\n");
    }

    #[test]
    fn test_input_tree_layout() {
        let root = input_tree();
        for sub in ["profiles", "ssh", "sst"] {
            assert!(root.path().join(sub).is_dir());
        }
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let dir = temp_test_dir();
        let path = dir.path().to_path_buf();
        drop(dir);
        assert!(!path.exists());
    }
}
