//! File relocation.
//! Copies the bytes to the new path, then removes the original. A failure
//! partway leaves at most a stale copy at the destination, never a missing
//! source: the source is only removed after the destination write succeeded.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{io_failure, ReshardError};
use crate::platform::write_file_with_mode;

use super::DEFAULT_FILE_PERM;

/// Move `old_path` to `new_path` by copy and remove.
pub fn copy_file(old_path: &Path, new_path: &Path) -> Result<(), ReshardError> {
    let data = fs::read(old_path).map_err(io_failure(ReshardError::read, old_path))?;

    write_file_with_mode(new_path, &data, DEFAULT_FILE_PERM)
        .map_err(io_failure(ReshardError::write, new_path))?;

    fs::remove_file(old_path).map_err(io_failure(ReshardError::remove, old_path))?;

    debug!(src = %old_path.display(), dest = %new_path.display(), bytes = data.len(), "Relocated file");
    Ok(())
}
