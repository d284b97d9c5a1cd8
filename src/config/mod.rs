//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SIA_RESHARD_CONFIG";

/// Tree resharded when nothing else is configured.
pub const ROOT_DEFAULT: &str = "./fs/var/skynet";
/// Audit log of created shard directories, relative to the working directory.
pub const DIR_LOG_DEFAULT: &str = "dirpaths";
