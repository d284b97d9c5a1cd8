//! Config validation logic.
//! Verifies the root is a readable directory that is not the filesystem root,
//! and that the dir log can be created where configured.

use anyhow::{bail, Context, Result};
use std::fs;
use tracing::{debug, error, info};

use super::types::Config;

impl Config {
    /// Validate the root and dir log locations before any file is touched.
    pub fn validate(&self) -> Result<()> {
        let root = &self.root;

        if !root.exists() {
            error!("root does not exist: {}", root.display());
            bail!("root does not exist: {}", root.display());
        }
        if !root.is_dir() {
            error!("root is not a directory: {}", root.display());
            bail!("root is not a directory: {}", root.display());
        }
        fs::read_dir(root).with_context(|| {
            format!("Cannot read root directory '{}'; check permissions", root.display())
        })?;
        debug!("root readable: {}", root.display());

        let root_real = dunce::canonicalize(root)
            .with_context(|| format!("resolve root '{}'", root.display()))?;
        if root_real.parent().is_none() {
            bail!("refusing to reshard the filesystem root '{}'", root_real.display());
        }

        if self.dir_log.is_dir() {
            bail!("dir_log '{}' is a directory", self.dir_log.display());
        }
        if let Some(parent) = self.dir_log.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                bail!(
                    "dir_log parent directory does not exist: {}",
                    parent.display()
                );
            }
        }

        info!(
            "Config validated: root='{}' dir_log='{}' shape={}x{}",
            root_real.display(),
            self.dir_log.display(),
            self.shape.depth(),
            self.shape.length()
        );
        Ok(())
    }
}
