//! Empty-directory pruning.
//!
//! A directory whose only entry is the sentinel counts as empty. Removing one
//! can leave its parent empty too, so deletion cascades upward until a
//! non-empty ancestor or the tree root is reached. The root itself is never
//! removed.

use anyhow::Result;
use std::fs;
use std::io;
use std::ops::AddAssign;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{io_failure, ReshardError};
use crate::sentinel::SENTINEL_NAME;
use crate::walk::{live_entries, prune_walk};

/// Counters reported by the prune pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneSummary {
    pub dirs_visited: u64,
    pub dirs_removed: u64,
    pub sentinels_removed: u64,
}

impl AddAssign for PruneSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.dirs_visited += rhs.dirs_visited;
        self.dirs_removed += rhs.dirs_removed;
        self.sentinels_removed += rhs.sentinels_removed;
    }
}

/// Walk `root` children-first and prune every empty directory found.
pub fn delete_empty_dirs(root: &Path) -> Result<PruneSummary> {
    let mut summary = PruneSummary::default();

    for entry in live_entries(prune_walk(root), root) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        summary.dirs_visited += 1;
        summary += recursive_delete(entry.path(), root)?;
    }

    info!(
        visited = summary.dirs_visited,
        removed = summary.dirs_removed,
        sentinels = summary.sentinels_removed,
        "Prune walk finished"
    );
    Ok(summary)
}

/// Remove `path` and then each parent in turn while it holds nothing but a
/// sentinel. Stops at the first non-empty directory, at `root`, at `.` and at
/// the filesystem root. A directory that is already gone ends the cascade
/// without error.
pub fn recursive_delete(path: &Path, root: &Path) -> Result<PruneSummary, ReshardError> {
    let mut summary = PruneSummary::default();
    let mut current = path;

    while !is_boundary(current, root) {
        let mut entries = match fs::read_dir(current) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(ReshardError::list_dir(current.to_path_buf(), e)),
        };
        let first = entries
            .next()
            .transpose()
            .map_err(io_failure(ReshardError::list_dir, current))?;
        let second = entries
            .next()
            .transpose()
            .map_err(io_failure(ReshardError::list_dir, current))?;
        drop(entries);

        if second.is_some() {
            break;
        }
        if let Some(only) = first {
            if only.file_name() != SENTINEL_NAME {
                break;
            }
            let sentinel = only.path();
            match fs::remove_file(&sentinel) {
                Ok(()) => summary.sentinels_removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(ReshardError::remove(sentinel, e)),
            }
        }

        match fs::remove_dir(current) {
            Ok(()) => {
                summary.dirs_removed += 1;
                debug!(dir = %current.display(), "Removed empty directory");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ReshardError::remove(current.to_path_buf(), e)),
        }

        current = match current.parent() {
            Some(parent) => parent,
            None => break,
        };
    }

    Ok(summary)
}

fn is_boundary(path: &Path, root: &Path) -> bool {
    path == root
        || !path.starts_with(root)
        || path.as_os_str().is_empty()
        || path == Path::new(".")
        || path.parent().is_none()
}
