//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - The positional MODE keeps the historical `delete-only` spelling.
//! - --debug is a shorthand for --log-level debug.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::shard::ShardShape;

/// Which phases to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RunMode {
    /// Rename into the shard layout, then prune empty directories
    #[default]
    Full,
    /// Only prune empty directories
    #[value(alias = "prune-only")]
    DeleteOnly,
}

/// Reshard a siafile tree into a fixed-depth layout.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Reshard a siafile tree into aa/bb/cc/<name> directories and prune empty ones"
)]
pub struct Args {
    /// Run mode: `full` (default) or `delete-only`.
    #[arg(value_enum, value_name = "MODE")]
    pub mode: Option<RunMode>,

    /// Tree to reshard.
    #[arg(long, value_hint = ValueHint::DirPath, help = "Override the tree root")]
    pub root: Option<PathBuf>,

    /// File that records each created shard directory.
    #[arg(long, value_hint = ValueHint::FilePath, help = "Override the dir log path")]
    pub dir_log: Option<PathBuf>,

    /// Number of shard directory levels.
    #[arg(long, help = "Shard directory levels")]
    pub dir_depth: Option<usize>,

    /// Characters per shard directory level.
    #[arg(long, help = "Characters per shard directory level")]
    pub dir_length: Option<usize>,

    /// Explicit config file (takes precedence over SIA_RESHARD_CONFIG).
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Print where the config file is looked up, then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    pub fn run_mode(&self) -> RunMode {
        self.mode.unwrap_or_default()
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    /// Fails only when the resulting shard shape is invalid.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(root) = &self.root {
            cfg.root = root.clone();
        }
        if let Some(dir_log) = &self.dir_log {
            cfg.dir_log = dir_log.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(log_file) = &self.log_file {
            cfg.log_file = Some(log_file.clone());
        }
        if self.dir_depth.is_some() || self.dir_length.is_some() {
            let depth = self.dir_depth.unwrap_or(cfg.shape.depth());
            let length = self.dir_length.unwrap_or(cfg.shape.length());
            cfg.shape = ShardShape::new(depth, length).context("invalid --dir-depth/--dir-length")?;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
