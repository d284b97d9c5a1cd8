//! Shard layout: the shape of the target tree, the classifier that checks a
//! path against it, and the random name generator that mints new paths in it.

mod name;
mod shape;

pub use name::NAME_STEM_LEN;
pub use shape::ShardShape;

use std::path::Path;

/// Render a relative path with `/` separators regardless of platform, so the
/// classifier sees the same string on every OS.
pub fn path_to_slash(path: &Path) -> String {
    let mut out = String::new();
    if path.has_root() {
        out.push('/');
    }
    let mut first = true;
    for comp in path.components() {
        match comp {
            std::path::Component::RootDir | std::path::Component::Prefix(_) => continue,
            other => {
                if !first {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
                first = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_to_slash_keeps_leading_root() {
        assert_eq!(path_to_slash(Path::new("/aa/bb/name.sia")), "/aa/bb/name.sia");
        assert_eq!(path_to_slash(Path::new("aa/bb")), "aa/bb");
        assert_eq!(path_to_slash(Path::new("")), "");
    }
}
