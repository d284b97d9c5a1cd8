//! Directory walks shared by the rename and prune passes.
//!
//! Both passes change the tree while walking it, so an entry listed by its
//! parent may be gone by the time the walk reaches it. Such entries are
//! dropped here; every other walk error ends the pass.

use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::errors::ReshardError;

/// Parents before children, siblings by file name.
pub(crate) fn rename_walk(root: &Path) -> WalkDir {
    WalkDir::new(root).sort_by_file_name()
}

/// Children before parents, so a directory is judged after its contents.
pub(crate) fn prune_walk(root: &Path) -> WalkDir {
    WalkDir::new(root).sort_by_file_name().contents_first(true)
}

/// Yield the entries of `walker`, skipping those that vanished mid-walk.
pub(crate) fn live_entries(
    walker: WalkDir,
    root: &Path,
) -> impl Iterator<Item = Result<DirEntry, ReshardError>> + '_ {
    walker.into_iter().filter_map(move |entry| match entry {
        Ok(e) => Some(Ok(e)),
        Err(e) if vanished(&e) => {
            debug!(error = %e, "Entry vanished during walk; skipping");
            None
        }
        Err(e) => {
            let path = e.path().unwrap_or(root).to_path_buf();
            Some(Err(ReshardError::WalkFailure { path, source: e }))
        }
    })
}

/// True when a walk error only means an entry below the root disappeared
/// after its parent was listed. A missing root is still an error.
fn vanished(e: &walkdir::Error) -> bool {
    e.depth() > 0
        && e.io_error()
            .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}
