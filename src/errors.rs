//! Typed error definitions for sia_reshard.
//! One variant per failing step, each carrying the path it failed on so logs
//! and tests can tell a read failure from a remove failure.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReshardError {
    #[error("read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("remove {path}: {source}")]
    RemoveFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("create directory {path}: {source}")]
    DirectoryCreateFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("list directory {path}: {source}")]
    DirectoryListFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialize sentinel metadata for {path}: {source}")]
    SerializationFailure {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("create sentinel {path}: {source}")]
    SentinelCreateFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("write was only applied partially to {path}: {written} / {expected} bytes")]
    PartialWriteFailure {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("sync {path}: {source}")]
    SyncFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("walk {path}: {source}")]
    WalkFailure {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid shard shape: depth {depth}, length {length} (each at least 1, depth * length at most 1024)")]
    InvalidShape { depth: usize, length: usize },
}

impl ReshardError {
    /// Stable numeric code for structured logs and exit reporting.
    pub fn code(&self) -> u32 {
        match self {
            ReshardError::ReadFailure { .. } => 10,
            ReshardError::WriteFailure { .. } => 11,
            ReshardError::RemoveFailure { .. } => 12,
            ReshardError::DirectoryCreateFailure { .. } => 20,
            ReshardError::DirectoryListFailure { .. } => 21,
            ReshardError::SerializationFailure { .. } => 30,
            ReshardError::SentinelCreateFailure { .. } => 31,
            ReshardError::PartialWriteFailure { .. } => 32,
            ReshardError::SyncFailure { .. } => 33,
            ReshardError::WalkFailure { .. } => 40,
            ReshardError::InvalidShape { .. } => 50,
        }
    }

    /// Short machine-friendly name of the failing step.
    pub fn kind(&self) -> &'static str {
        match self {
            ReshardError::ReadFailure { .. } => "read_failure",
            ReshardError::WriteFailure { .. } => "write_failure",
            ReshardError::RemoveFailure { .. } => "remove_failure",
            ReshardError::DirectoryCreateFailure { .. } => "directory_create_failure",
            ReshardError::DirectoryListFailure { .. } => "directory_list_failure",
            ReshardError::SerializationFailure { .. } => "serialization_failure",
            ReshardError::SentinelCreateFailure { .. } => "sentinel_create_failure",
            ReshardError::PartialWriteFailure { .. } => "partial_write_failure",
            ReshardError::SyncFailure { .. } => "sync_failure",
            ReshardError::WalkFailure { .. } => "walk_failure",
            ReshardError::InvalidShape { .. } => "invalid_shape",
        }
    }

    /// Path the failure refers to, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ReshardError::ReadFailure { path, .. }
            | ReshardError::WriteFailure { path, .. }
            | ReshardError::RemoveFailure { path, .. }
            | ReshardError::DirectoryCreateFailure { path, .. }
            | ReshardError::DirectoryListFailure { path, .. }
            | ReshardError::SerializationFailure { path, .. }
            | ReshardError::SentinelCreateFailure { path, .. }
            | ReshardError::PartialWriteFailure { path, .. }
            | ReshardError::SyncFailure { path, .. }
            | ReshardError::WalkFailure { path, .. } => Some(path),
            ReshardError::InvalidShape { .. } => None,
        }
    }
}

/// `map_err` adapter: `fs::read(p).map_err(io_failure(ReshardError::read, p))`.
/// Keeps call sites short while still recording which step failed.
pub(crate) fn io_failure<'a>(
    make: fn(PathBuf, io::Error) -> ReshardError,
    path: &'a std::path::Path,
) -> impl FnOnce(io::Error) -> ReshardError + 'a {
    move |source| make(path.to_path_buf(), source)
}

impl ReshardError {
    pub(crate) fn read(path: PathBuf, source: io::Error) -> Self {
        ReshardError::ReadFailure { path, source }
    }
    pub(crate) fn write(path: PathBuf, source: io::Error) -> Self {
        ReshardError::WriteFailure { path, source }
    }
    pub(crate) fn remove(path: PathBuf, source: io::Error) -> Self {
        ReshardError::RemoveFailure { path, source }
    }
    pub(crate) fn create_dir(path: PathBuf, source: io::Error) -> Self {
        ReshardError::DirectoryCreateFailure { path, source }
    }
    pub(crate) fn list_dir(path: PathBuf, source: io::Error) -> Self {
        ReshardError::DirectoryListFailure { path, source }
    }
    pub(crate) fn sentinel_create(path: PathBuf, source: io::Error) -> Self {
        ReshardError::SentinelCreateFailure { path, source }
    }
    pub(crate) fn sync(path: PathBuf, source: io::Error) -> Self {
        ReshardError::SyncFailure { path, source }
    }
}
