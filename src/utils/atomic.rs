//! Atomic file operations
//!
//! This module provides utilities for atomic file writes to prevent
//! data corruption during crashes or power failures.
//!
//! # Pattern
//!
//! 1. Write to a temporary file (.tmp)
//! 2. Call sync_all() to flush to disk
//! 3. Rename temp file to final path (atomic on most filesystems)
//!
//! This ensures that the final file is either:
//! - The old version (if crash before rename)
//! - The new version (if rename completed)
//! - Never a partial/corrupted state

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Path of the temp file used while replacing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("tmp")
}

/// Atomically write content to a file
///
/// Parent directories are created as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove the temp file left by an interrupted [`atomic_write`] to `path`
///
/// Returns whether a file was removed.
pub fn remove_stale_temp<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let temp_path = temp_path_for(path.as_ref());
    if !temp_path.exists() {
        return Ok(false);
    }
    fs::remove_file(&temp_path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cursor.txt");

        atomic_write(&path, "cursor=3\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "cursor=3\n");
        // Temp file should not exist
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cursor.txt");

        atomic_write(&path, "cursor=1\ncursor=2\n").unwrap();
        atomic_write(&path, "cursor=9\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "cursor=9\n");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("nested").join("cursor.txt");

        atomic_write(&path, "cursor=0\n").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_remove_stale_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cursor.txt");

        assert!(!remove_stale_temp(&path).unwrap());

        fs::write(temp_path_for(&path), "cursor=").unwrap();
        assert!(remove_stale_temp(&path).unwrap());
        assert!(!temp_path_for(&path).exists());
    }
}
