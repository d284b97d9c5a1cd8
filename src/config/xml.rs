//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Unknown tags are rejected so typos surface instead of being ignored.
//! - A missing file at the default location just means "use defaults".

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::shard::ShardShape;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use super::CONFIG_ENV;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    root: Option<String>,
    dir_log: Option<String>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    dir_depth: Option<usize>,
    #[serde(default, deserialize_with = "de_usize_trimmed_opt")]
    dir_length: Option<usize>,
    log_level: Option<String>,
    log_file: Option<String>,
}

// Trims surrounding whitespace; an unparsable number is an error, not a silent default.
fn de_usize_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn non_empty_path(s: Option<&str>) -> Option<PathBuf> {
    s.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(PathBuf::from)
}

// Map XmlConfig -> Config, starting from defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(root) = non_empty_path(parsed.root.as_deref()) {
        cfg.root = root;
    }
    if let Some(dir_log) = non_empty_path(parsed.dir_log.as_deref()) {
        cfg.dir_log = dir_log;
    }
    cfg.log_file = non_empty_path(parsed.log_file.as_deref());

    if let Some(s) = parsed.log_level.as_deref() {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }

    let depth = parsed.dir_depth.unwrap_or(cfg.shape.depth());
    let length = parsed.dir_length.unwrap_or(cfg.shape.length());
    cfg.shape = ShardShape::new(depth, length)?;

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Resolve and load the config.
///
/// Precedence: `explicit` path, then `$SIA_RESHARD_CONFIG`, then the default
/// location. An explicitly named file must exist; a missing default file
/// yields defaults. Returns the config and the file it came from, if any.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
    let named = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    if let Some(path) = named {
        let cfg = load_config_from_xml_path(&path)?;
        return Ok((cfg, Some(path)));
    }

    match default_config_path() {
        Some(path) if path.is_file() => {
            let cfg = load_config_from_xml_path(&path)?;
            Ok((cfg, Some(path)))
        }
        Some(path) => {
            debug!(path = %path.display(), "No config file; using defaults");
            Ok((Config::default(), None))
        }
        None => Ok((Config::default(), None)),
    }
}
