//! Startup sweep for files that never got a record.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Delete every `.pdf` directly under `dir` that is not in `known_paths`.
///
/// A crash between rendering and recording leaves such files behind. Returns
/// the removed paths. A missing directory is treated as empty.
pub fn reconcile_orphans(dir: &Path, known_paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    let known: HashSet<&Path> = known_paths.iter().map(PathBuf::as_path).collect();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf || !path.is_file() || known.contains(path.as_path()) {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove orphaned document"),
        }
    }

    if !removed.is_empty() {
        info!(count = removed.len(), dir = %dir.display(), "removed orphaned documents");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_unrecorded_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        let kept = dir.path().join("Invoice_A_01-01-2024_001.pdf");
        let orphan = dir.path().join("Invoice_B_01-01-2024_002.pdf");
        let other = dir.path().join("notes.txt");
        for p in [&kept, &orphan, &other] {
            fs::write(p, b"x").unwrap();
        }

        let removed = reconcile_orphans(dir.path(), &[kept.clone()]).unwrap();

        assert_eq!(removed, vec![orphan.clone()]);
        assert!(kept.exists());
        assert!(!orphan.exists());
        assert!(other.exists());
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let removed = reconcile_orphans(&dir.path().join("absent"), &[]).unwrap();
        assert!(removed.is_empty());
    }
}
