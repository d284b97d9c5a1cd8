//! Directory sentinel (`.siadir`) creation.
//!
//! Every shard directory carries a small JSON metadata record. It is written
//! once with default health values and never rewritten: an existing sentinel
//! is left untouched so its timestamps survive re-runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{io_failure, ReshardError};
use crate::fs_ops::DEFAULT_DIR_PERM;
use crate::platform::open_truncate_with_mode;

/// Filename of the sentinel inside each directory.
pub const SENTINEL_NAME: &str = ".siadir";

/// Health value of a directory nothing has been measured for yet.
pub const DEFAULT_DIR_HEALTH: f64 = 0.0;
/// Redundancy value of a directory nothing has been measured for yet.
pub const DEFAULT_DIR_REDUNDANCY: f64 = -1.0;

const SENTINEL_FILE_PERM: u32 = 0o600;

/// Metadata record stored in the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirMetadata {
    #[serde(rename = "aggregatehealth")]
    pub aggregate_health: f64,
    #[serde(rename = "aggregateminredundancy")]
    pub aggregate_min_redundancy: f64,
    #[serde(rename = "aggregatemodtime")]
    pub aggregate_mod_time: DateTime<Utc>,
    #[serde(rename = "aggregateremotehealth")]
    pub aggregate_remote_health: f64,
    #[serde(rename = "aggregatestuckhealth")]
    pub aggregate_stuck_health: f64,

    pub health: f64,
    #[serde(rename = "minredundancy")]
    pub min_redundancy: f64,
    pub mode: u32,
    #[serde(rename = "modtime")]
    pub mod_time: DateTime<Utc>,
    #[serde(rename = "remotehealth")]
    pub remote_health: f64,
    #[serde(rename = "stuckhealth")]
    pub stuck_health: f64,
}

impl DirMetadata {
    /// Fresh record with default health values, both timestamps set to `now`.
    pub fn new_default(now: DateTime<Utc>) -> Self {
        Self {
            aggregate_health: DEFAULT_DIR_HEALTH,
            aggregate_min_redundancy: DEFAULT_DIR_REDUNDANCY,
            aggregate_mod_time: now,
            aggregate_remote_health: DEFAULT_DIR_HEALTH,
            aggregate_stuck_health: DEFAULT_DIR_HEALTH,
            health: DEFAULT_DIR_HEALTH,
            min_redundancy: DEFAULT_DIR_REDUNDANCY,
            mode: DEFAULT_DIR_PERM,
            mod_time: now,
            remote_health: DEFAULT_DIR_HEALTH,
            stuck_health: DEFAULT_DIR_HEALTH,
        }
    }

    /// Read the sentinel stored in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ReshardError> {
        let path = sentinel_path(dir);
        let data = fs::read(&path).map_err(io_failure(ReshardError::read, &path))?;
        serde_json::from_slice(&data)
            .map_err(|source| ReshardError::SerializationFailure { path, source })
    }
}

/// Path of the sentinel inside `dir`.
pub fn sentinel_path(dir: &Path) -> PathBuf {
    dir.join(SENTINEL_NAME)
}

/// Ensure `dir` has a sentinel. Returns `true` if one was written.
///
/// Any stat result other than "not found" counts as present, so an existing
/// sentinel is never opened, read or rewritten.
pub fn create_sia_dir(dir: &Path) -> Result<bool, ReshardError> {
    let path = sentinel_path(dir);
    match fs::symlink_metadata(&path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        _ => return Ok(false),
    }

    let md = DirMetadata::new_default(Utc::now());
    let data = serde_json::to_vec(&md).map_err(|source| ReshardError::SerializationFailure {
        path: path.clone(),
        source,
    })?;

    let mut file = open_truncate_with_mode(&path, SENTINEL_FILE_PERM)
        .map_err(io_failure(ReshardError::sentinel_create, &path))?;

    let written = file
        .write(&data)
        .map_err(io_failure(ReshardError::write, &path))?;
    if written < data.len() {
        return Err(ReshardError::PartialWriteFailure {
            path,
            written,
            expected: data.len(),
        });
    }
    file.sync_all().map_err(io_failure(ReshardError::sync, &path))?;

    debug!(path = %path.display(), "Created sentinel");
    Ok(true)
}
