//! Tree rename walk.
//!
//! Visits every `.sia` file under the root once. Files already in the shard
//! layout only get their directory's sentinel checked; everything else is
//! moved, together with its `-extended` companion, to a freshly minted shard
//! path. Re-running over the same tree is safe: placed files are skipped.

use anyhow::{Context, Result};
use rand::RngCore;
use rand::rngs::OsRng;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{io_failure, ReshardError};
use crate::fs_ops::{copy_file, DEFAULT_DIR_PERM};
use crate::platform::create_dir_all_with_mode;
use crate::sentinel::create_sia_dir;
use crate::shard::{path_to_slash, ShardShape};
use crate::walk::{live_entries, rename_walk};

/// Extension of the files this tool manages.
pub const PRIMARY_EXTENSION: &str = ".sia";
/// Token between the base name and the extension of a companion file.
pub const COMPANION_SUFFIX: &str = "-extended";

const PROGRESS_EVERY: u64 = 1000;

/// Shard directories already used as a destination during one run.
#[derive(Debug, Default, Clone)]
pub struct DestinationDirs {
    seen: HashSet<PathBuf>,
}

impl DestinationDirs {
    pub fn contains(&self, dir: &Path) -> bool {
        self.seen.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn insert(&mut self, dir: PathBuf) {
        self.seen.insert(dir);
    }

    fn clear(&mut self) {
        self.seen.clear();
    }
}

/// Counters reported at the end of a rename walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenameSummary {
    /// Primary-extension files visited, companions included.
    pub primary_seen: u64,
    pub already_placed: u64,
    pub moved: u64,
    pub companions_moved: u64,
    pub dirs_created: u64,
    /// Lines that could not be appended to the dir log.
    pub log_write_failures: u64,
}

fn has_primary_extension(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(PRIMARY_EXTENSION.as_bytes())
}

/// File name of `primary` without the primary extension, byte for byte.
fn primary_base(primary: &Path) -> Option<OsString> {
    let name = primary.file_name()?;
    if !has_primary_extension(name) {
        return None;
    }
    // `.sia` alone has no stem, only a hidden name
    match (primary.file_stem(), primary.extension()) {
        (Some(stem), Some(_)) => Some(stem.to_os_string()),
        _ => Some(OsString::new()),
    }
}

fn companion_name(base: &OsStr) -> OsString {
    let mut name = base.to_os_string();
    name.push(COMPANION_SUFFIX);
    name.push(PRIMARY_EXTENSION);
    name
}

/// Build the companion path `<base>-extended.sia` next to `<base>.sia`.
/// Names that are not valid UTF-8 are handled without loss.
pub fn companion_path(primary: &Path) -> Option<PathBuf> {
    let base = primary_base(primary)?;
    Some(primary.with_file_name(companion_name(&base)))
}

/// Owns the state of rename runs: the shard shape, the random source and the
/// set of destination directories used by the current run.
pub struct Renamer<R = OsRng> {
    shape: ShardShape,
    rng: R,
    dirs: DestinationDirs,
}

impl Renamer<OsRng> {
    pub fn new(shape: ShardShape) -> Self {
        Self::with_rng(shape, OsRng)
    }
}

impl<R: RngCore> Renamer<R> {
    pub fn with_rng(shape: ShardShape, rng: R) -> Self {
        Self {
            shape,
            rng,
            dirs: DestinationDirs::default(),
        }
    }

    pub fn shape(&self) -> ShardShape {
        self.shape
    }

    /// Destination directories used by the most recent run.
    pub fn dirs(&self) -> &DestinationDirs {
        &self.dirs
    }

    /// Walk `root` and move every misplaced primary file into the shard layout.
    ///
    /// Each newly used shard directory is appended to `log_sink` as one line.
    /// Log writes are best-effort; any other failure aborts the walk.
    pub fn rename_all<W: Write>(&mut self, log_sink: &mut W, root: &Path) -> Result<RenameSummary> {
        self.dirs.clear();
        let mut summary = RenameSummary::default();

        for entry in live_entries(rename_walk(root), root) {
            let entry = entry?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !has_primary_extension(entry.file_name()) {
                continue;
            }
            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "Skipping non-regular file");
                continue;
            }

            summary.primary_seen += 1;
            if summary.primary_seen % PROGRESS_EVERY == 0 {
                info!(files = summary.primary_seen, "Files handled");
            }

            self.handle_file(log_sink, root, entry.path(), &mut summary)?;
        }

        info!(
            seen = summary.primary_seen,
            placed = summary.already_placed,
            moved = summary.moved,
            companions = summary.companions_moved,
            dirs = summary.dirs_created,
            "Rename walk finished"
        );
        Ok(summary)
    }

    fn handle_file<W: Write>(
        &mut self,
        log_sink: &mut W,
        root: &Path,
        path: &Path,
        summary: &mut RenameSummary,
    ) -> Result<()> {
        let rel = path.strip_prefix(root).unwrap_or(path);
        if self.shape.valid_dir_structure(&path_to_slash(rel)) {
            let dir = path.parent().unwrap_or(root);
            create_sia_dir(dir)
                .with_context(|| format!("ensure sentinel for placed file '{}'", path.display()))?;
            summary.already_placed += 1;
            debug!(path = %path.display(), "Already placed");
            return Ok(());
        }

        let base = primary_base(path).unwrap_or_default();
        if base.as_encoded_bytes().ends_with(COMPANION_SUFFIX.as_bytes()) {
            // moved along with its primary
            return Ok(());
        }

        let new_path = root.join(format!("{}{}", self.shape.random_name(&mut self.rng), PRIMARY_EXTENSION));
        let old_companion = path.with_file_name(companion_name(&base));
        let new_companion = companion_path(&new_path).unwrap_or_else(|| new_path.clone());

        let dir = new_path.parent().unwrap_or(root).to_path_buf();
        if !self.dirs.contains(&dir) {
            if let Err(e) = writeln!(log_sink, "{}", dir.display()) {
                summary.log_write_failures += 1;
                warn!(dir = %dir.display(), error = %e, "Unable to record shard directory in dir log");
            }

            create_dir_all_with_mode(&dir, DEFAULT_DIR_PERM)
                .map_err(io_failure(ReshardError::create_dir, &dir))
                .with_context(|| format!("create shard directory for '{}'", path.display()))?;

            create_sia_dir(&dir)
                .with_context(|| format!("create sentinel in new shard directory '{}'", dir.display()))?;

            summary.dirs_created += 1;
            info!(dir = %dir.display(), "Created shard directory");
            self.dirs.insert(dir);
        }

        if path == new_path {
            return Ok(());
        }

        copy_file(path, &new_path)
            .with_context(|| format!("relocate '{}' -> '{}'", path.display(), new_path.display()))?;
        summary.moved += 1;
        debug!(src = %path.display(), dest = %new_path.display(), "Moved file");

        match fs::symlink_metadata(&old_companion) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(ReshardError::read(old_companion.clone(), e))
                    .with_context(|| format!("stat companion of '{}'", path.display()));
            }
            Ok(_) => {}
        }

        copy_file(&old_companion, &new_companion).with_context(|| {
            format!(
                "relocate companion '{}' -> '{}'",
                old_companion.display(),
                new_companion.display()
            )
        })?;
        summary.companions_moved += 1;
        Ok(())
    }
}

/// One-shot rename walk with a fresh destination set and the OS random source.
pub fn rename_all<W: Write>(log_sink: &mut W, root: &Path, shape: ShardShape) -> Result<RenameSummary> {
    Renamer::new(shape).rename_all(log_sink, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn companion_path_inserts_suffix_before_extension() {
        let p = Path::new("/t/a/file.sia");
        assert_eq!(companion_path(p).unwrap(), PathBuf::from("/t/a/file-extended.sia"));
        assert!(companion_path(Path::new("/t/a/file.txt")).is_none());
        assert_eq!(
            companion_path(Path::new("/t/a/v1.2.sia")).unwrap(),
            PathBuf::from("/t/a/v1.2-extended.sia")
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_keep_their_companion() {
        use std::os::unix::ffi::OsStrExt;

        let temp = assert_fs::TempDir::new().unwrap();
        let old = temp.child("old");
        old.create_dir_all().unwrap();
        let primary = old.path().join(OsStr::from_bytes(b"x\xff.sia"));
        let companion = old.path().join(OsStr::from_bytes(b"x\xff-extended.sia"));
        fs::write(&primary, "primary").unwrap();
        fs::write(&companion, "companion").unwrap();
        assert_eq!(companion_path(&primary).unwrap(), companion);

        let mut log = Vec::new();
        let summary = rename_all(&mut log, temp.path(), ShardShape::DEFAULT).unwrap();

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.companions_moved, 1);
        assert!(!primary.exists());
        assert!(!companion.exists());

        let rerun = rename_all(&mut log, temp.path(), ShardShape::DEFAULT).unwrap();
        assert_eq!(rerun.moved, 0);
        assert_eq!(rerun.already_placed, 2);
    }

    #[test]
    fn missing_root_is_a_walk_failure() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = rename_all(&mut Vec::new(), &temp.path().join("absent"), ShardShape::DEFAULT)
            .unwrap_err();
        let typed = err.downcast_ref::<ReshardError>().expect("typed error");
        assert_eq!(typed.kind(), "walk_failure");
    }

    #[test]
    fn ignores_other_extensions() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("notes.txt").write_str("x").unwrap();
        temp.child("a/b.siadir").write_str("x").unwrap();

        let mut log = Vec::new();
        let summary = rename_all(&mut log, temp.path(), ShardShape::DEFAULT).unwrap();

        assert_eq!(summary, RenameSummary::default());
        assert!(log.is_empty());
        temp.child("notes.txt").assert("x");
    }

    #[test]
    fn files_sharing_a_new_directory_log_it_once() {
        // depth 1, length 1 leaves only 16 possible shard dirs, so 40 files
        // must reuse some of them
        let temp = assert_fs::TempDir::new().unwrap();
        for i in 0..40 {
            temp.child(format!("f{i}.sia")).write_str("x").unwrap();
        }

        let shape = ShardShape::new(1, 1).unwrap();
        let mut renamer = Renamer::with_rng(shape, StdRng::seed_from_u64(1));
        let mut log = Vec::new();
        let summary = renamer.rename_all(&mut log, temp.path()).unwrap();

        let lines: Vec<_> = String::from_utf8(log).unwrap().lines().map(str::to_owned).collect();
        let unique: HashSet<_> = lines.iter().cloned().collect();
        assert_eq!(summary.moved, 40);
        assert_eq!(lines.len(), unique.len());
        assert_eq!(lines.len() as u64, summary.dirs_created);
        assert_eq!(renamer.dirs().len(), lines.len());
        assert!(lines.len() <= 16);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dir_log_failures_do_not_abort_moves() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.sia").write_str("payload").unwrap();

        let summary = rename_all(&mut FailingSink, temp.path(), ShardShape::DEFAULT).unwrap();

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.log_write_failures, 1);
        assert!(!temp.child("a.sia").path().exists());
    }
}
