//! Core library for `sia_reshard`.
//!
//! Moves `.sia` files (and their `-extended` companions) from an irregular
//! tree into a fixed-depth shard layout such as `aa/bb/cc/<name>.sia`, then
//! prunes directories left holding nothing but a `.siadir` sentinel.
//!
//! The two phases, [`Renamer::rename_all`] and [`delete_empty_dirs`], are
//! independent and idempotent: re-running either over a partially processed
//! tree picks up where an interrupted run stopped.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod prune;
pub mod rename;
pub mod sentinel;
pub mod shard;
mod walk;

pub use config::{
    default_config_path, load_config, load_config_from_xml_path,
    path_has_symlink_ancestor, Config, LogLevel,
};
pub use errors::ReshardError;
pub use fs_ops::copy_file;
pub use prune::{delete_empty_dirs, recursive_delete, PruneSummary};
pub use rename::{
    companion_path, rename_all, DestinationDirs, RenameSummary, Renamer, COMPANION_SUFFIX,
    PRIMARY_EXTENSION,
};
pub use sentinel::{create_sia_dir, DirMetadata, SENTINEL_NAME};
pub use shard::ShardShape;
