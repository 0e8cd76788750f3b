//! File-system writer for the export tree.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AppError, Result};

/// Output operations the export engine performs.
pub trait LayoutWriter {
    /// Creates a directory and its parents if absent.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Writes a UTF-8 text file, replacing any existing file.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    fn write_text(&self, path: &Path, content: &str) -> Result<()>;

    /// Writes `value` as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(AppError::json_parse)?;
        self.write_text(path, &content)
    }

    /// Copies a binary file.
    ///
    /// # Errors
    /// Returns error if the copy fails.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;

    /// Whether `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Writes directly to the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLayout;

impl LayoutWriter for FsLayout {
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            AppError::io(format!("Failed to create directory {}", path.display()), e)
        })
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<()> {
        fs::write(path, content)
            .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        fs::copy(from, to).map_err(|e| {
            AppError::io(
                format!("Failed to copy {} to {}", from.display(), to.display()),
                e,
            )
        })?;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_json_is_indented_and_keeps_unicode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.json");

        FsLayout
            .write_json(&path, &serde_json::json!({ "title": "Zażółć" }))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\n  \"title\": \"Zażółć\"\n}");
    }

    #[test]
    fn test_copy_and_is_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("nested");
        fs::write(&src, [0u8, 1, 2]).unwrap();

        FsLayout.create_dir_all(&dst).unwrap();
        FsLayout.copy_file(&src, &dst.join("dst.bin")).unwrap();

        assert!(FsLayout.is_file(&dst.join("dst.bin")));
        assert!(!FsLayout.is_file(&dst));
        assert_eq!(fs::read(dst.join("dst.bin")).unwrap(), vec![0u8, 1, 2]);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let result = FsLayout.write_text(&dir.path().join("missing").join("a.txt"), "x");
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
