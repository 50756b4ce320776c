//! Clean action for the redirected build tree
//!
//! Deletes the root build directory recursively. Idempotent: a missing
//! directory is a successful no-op, so running clean twice in a row is fine.
//! Real filesystem failures (permissions, busy files) surface as errors.

use crate::error::{Error, Result};
use crate::layout::BuildLayout;
use serde::Serialize;
use walkdir::WalkDir;

/// What the clean action removed
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Whether the build directory existed before the clean
    pub existed: bool,
    /// Files removed
    pub entries_removed: u64,
    /// Bytes freed
    pub bytes_freed: u64,
}

/// Remove the redirected root build directory and everything under it
pub fn clean(layout: &BuildLayout) -> Result<CleanReport> {
    let dir = layout.root_build_dir();

    if !dir.exists() {
        tracing::debug!(dir = %dir.display(), "build directory absent, nothing to clean");
        return Ok(CleanReport::default());
    }

    let mut report = CleanReport {
        existed: true,
        ..CleanReport::default()
    };

    // Size accounting before deletion; unreadable entries just don't count.
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            report.entries_removed += 1;
            report.bytes_freed += entry.metadata().map(|m| m.len()).unwrap_or(0);
        }
    }

    match std::fs::remove_dir_all(dir) {
        Ok(()) => {}
        // Lost a race with another clean; the outcome is what we wanted.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::clean_failed(dir).with_source(e)),
    }

    tracing::debug!(
        dir = %dir.display(),
        entries = report.entries_removed,
        bytes = report.bytes_freed,
        "build directory removed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn layout(root: &Path) -> BuildLayout {
        BuildLayout::redirect(root, "build")
    }

    #[test]
    fn test_clean_removes_build_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        fs::create_dir_all(layout.root_build_dir().join("app")).unwrap();
        fs::write(layout.root_build_dir().join("app/classes.dex"), b"dex").unwrap();

        let report = clean(&layout).unwrap();
        assert!(report.existed);
        assert_eq!(report.entries_removed, 1);
        assert_eq!(report.bytes_freed, 3);
        assert!(!layout.root_build_dir().exists());
    }

    #[test]
    fn test_clean_twice_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        fs::create_dir_all(layout.root_build_dir()).unwrap();

        let first = clean(&layout).unwrap();
        assert!(first.existed);

        let second = clean(&layout).unwrap();
        assert!(!second.existed);
        assert_eq!(second.entries_removed, 0);
    }

    #[test]
    fn test_clean_missing_directory_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let report = clean(&layout(dir.path())).unwrap();
        assert!(!report.existed);
        assert_eq!(report.bytes_freed, 0);
    }

    #[test]
    fn test_clean_counts_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout(dir.path());
        fs::create_dir_all(layout.root_build_dir().join("app/outputs")).unwrap();
        fs::write(layout.root_build_dir().join("app/outputs/app.apk"), b"apk!").unwrap();
        fs::write(layout.root_build_dir().join("app/log.txt"), b"1234567890").unwrap();

        let report = clean(&layout).unwrap();
        assert_eq!(report.entries_removed, 2);
        assert_eq!(report.bytes_freed, 14);
    }
}
