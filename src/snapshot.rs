//! Directory snapshotting.
//!
//! Reduces a directory tree to a relative-path -> size mapping plus a total
//! byte count. Unreadable entries are skipped and recorded as diagnostics so
//! a single bad file does not sink the whole comparison.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("comparison cancelled")]
    Cancelled,
}

/// One directory tree reduced to sizes. Keys are relative to the snapshot
/// root and use '/' separators on every platform.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub entries: BTreeMap<String, u64>,
    pub total_size: u64,
    pub diagnostics: Vec<String>,
}

/// Takes a size snapshot of the tree rooted at `root`.
pub fn snapshot(root: &Path) -> Result<Snapshot, SnapshotError> {
    snapshot_with_cancel(root, &AtomicBool::new(false))
}

/// Same as [`snapshot`], but checks `cancel` between entries and bails out
/// with [`SnapshotError::Cancelled`] once it is set.
pub fn snapshot_with_cancel(root: &Path, cancel: &AtomicBool) -> Result<Snapshot, SnapshotError> {
    let metadata = fs::metadata(root).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SnapshotError::NotFound {
                path: root.to_path_buf(),
            }
        } else {
            SnapshotError::Io {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(SnapshotError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut entries = BTreeMap::new();
    let mut diagnostics = Vec::new();
    let mut total_size: u64 = 0;
    let mut overflowed = false;

    for entry in WalkDir::new(root).follow_links(false) {
        if cancel.load(Ordering::Relaxed) {
            return Err(SnapshotError::Cancelled);
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // an unreadable subdirectory or file must not abort the walk
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "unknown path".to_string());
                diagnostics.push(format!("skipping {path}: {e}"));
                continue;
            }
        };

        // directories themselves are not entries, only the files below them
        if !entry.file_type().is_file() {
            continue;
        }

        let size = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                diagnostics.push(format!("skipping {}: {e}", entry.path().display()));
                continue;
            }
        };

        match total_size.checked_add(size) {
            Some(new_total) => total_size = new_total,
            None => {
                if !overflowed {
                    diagnostics.push(
                        "tree size exceeds u64::MAX, total capped at maximum value".to_string(),
                    );
                    overflowed = true;
                }
                total_size = u64::MAX;
            }
        }

        entries.insert(relative_key(entry.path(), root), size);
    }

    Ok(Snapshot {
        entries,
        total_size,
        diagnostics,
    })
}

// keys are stored relative to the walk root with '/' separators so snapshots
// taken on different hosts produce the same keys for the same tree
fn relative_key(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
