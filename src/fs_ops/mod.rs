//! Filesystem operations used by the rename walk.

mod relocate;

pub use relocate::copy_file;

/// Permission for relocated files.
pub const DEFAULT_FILE_PERM: u32 = 0o644;
/// Permission for newly created shard directories.
pub const DEFAULT_DIR_PERM: u32 = 0o755;
