//! Platform-specific helpers.
//! Hides POSIX permission handling behind a uniform API so the resharding
//! code never needs `cfg` blocks of its own.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    create_dir_all_with_mode, open_append_with_mode, open_log_file_secure_append,
    open_truncate_with_mode, write_file_with_mode,
};

#[cfg(not(unix))]
pub use windows::{
    create_dir_all_with_mode, open_append_with_mode, open_log_file_secure_append,
    open_truncate_with_mode, write_file_with_mode,
};
