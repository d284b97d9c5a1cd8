//! Unix implementations of platform helpers.
//! Modes passed here apply on creation only and are still subject to umask.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

/// Open read-write-append-create, like `O_RDWR|O_APPEND|O_CREAT`.
pub fn open_append_with_mode(path: &Path, mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .mode(mode)
        .open(path)
}

/// Open read-write, truncating or creating, like `O_RDWR|O_TRUNC|O_CREAT`.
pub fn open_truncate_with_mode(path: &Path, mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .truncate(true)
        .create(true)
        .mode(mode)
        .open(path)
}

/// Replace `path` with `data`, creating it with `mode` if missing.
pub fn write_file_with_mode(path: &Path, data: &[u8], mode: u32) -> io::Result<()> {
    let mut f = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .mode(mode)
        .open(path)?;
    f.write_all(data)
}

/// `mkdir -p` where every newly created level gets `mode`.
pub fn create_dir_all_with_mode(path: &Path, mode: u32) -> io::Result<()> {
    DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new_log.txt");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }

    #[test]
    fn append_keeps_previous_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dirpaths");
        {
            let mut f = open_append_with_mode(&path, 0o666).unwrap();
            f.write_all(b"one\n").unwrap();
        }
        {
            let mut f = open_append_with_mode(&path, 0o666).unwrap();
            f.write_all(b"two\n").unwrap();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn write_file_truncates_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        write_file_with_mode(&path, b"longer content", 0o644).unwrap();
        write_file_with_mode(&path, b"short", 0o644).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }
}
