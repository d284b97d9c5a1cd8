//! Shard shape and path classifier.
//!
//! A shape of depth 3 and length 2 describes paths like `aa/bb/cc/<filename>`.
//! The classifier is purely structural: it never touches the filesystem.

use crate::errors::ReshardError;

/// Number of directory levels and characters per level in the target layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardShape {
    depth: usize,
    length: usize,
}

impl Default for ShardShape {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ShardShape {
    /// `aa/bb/cc/<filename>`
    pub const DEFAULT: ShardShape = ShardShape {
        depth: 3,
        length: 2,
    };

    /// Upper bound on the characters spent on shard levels, `depth * length`.
    pub const MAX_PREFIX_CHARS: usize = 1024;

    pub fn new(depth: usize, length: usize) -> Result<Self, ReshardError> {
        let prefix = depth.checked_mul(length).unwrap_or(usize::MAX);
        if depth == 0 || length == 0 || prefix > Self::MAX_PREFIX_CHARS {
            return Err(ReshardError::InvalidShape { depth, length });
        }
        Ok(Self { depth, length })
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Report whether `path` already sits in the shard layout.
    ///
    /// The path is normalized first: redundant separators and `.` segments
    /// are dropped, `..` pops the previous segment, and a leading separator is
    /// ignored. A path ending in `/` is judged as a directory and must have
    /// exactly `depth` levels; anything else is judged as a file and must have
    /// `depth` levels followed by a filename of any length.
    pub fn valid_dir_structure(&self, path: &str) -> bool {
        let is_dir = path.is_empty() || path.ends_with('/');
        let segments = normalize(path);

        if is_dir {
            return segments.len() == self.depth
                && segments.iter().all(|s| s.chars().count() == self.length);
        }

        segments.len() == self.depth + 1
            && segments[..self.depth]
                .iter()
                .all(|s| s.chars().count() == self.length)
    }
}

fn normalize(path: &str) -> Vec<&str> {
    let rooted = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                // nothing above `/`
                None if rooted => {}
                _ => out.push(".."),
            },
            s => out.push(s),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sized_shapes() {
        assert!(ShardShape::new(0, 2).is_err());
        assert!(ShardShape::new(3, 0).is_err());
        assert_eq!(ShardShape::new(3, 2).unwrap(), ShardShape::DEFAULT);
    }

    #[test]
    fn rejects_oversized_shapes() {
        assert!(ShardShape::new(usize::MAX, 2).is_err());
        assert!(ShardShape::new(2, usize::MAX).is_err());
        assert!(ShardShape::new(ShardShape::MAX_PREFIX_CHARS + 1, 1).is_err());
        assert!(ShardShape::new(ShardShape::MAX_PREFIX_CHARS, 1).is_ok());
        assert!(ShardShape::new(4, 256).is_ok());
    }

    #[test]
    fn depth_two_length_two_table() {
        let shape = ShardShape::new(2, 2).unwrap();
        let cases = [
            ("/", false),
            ("/a/a/a/name", false),
            ("/name", false),
            ("/a/a/a/a/a/a/name", false),
            ("/aa/aa/aa/name/", false),
            ("/aa/aa/aa/name", false),
            ("/aa/aa/name", true),
            ("./aa/aa/name", true),
            ("aa/aa/name", true),
            ("//////aa/aa/name", true),
            ("/aa//////aa/name", true),
            ("/aa/a/name", false),
            ("/aa/aaa/name", false),
        ];
        for (path, want) in cases {
            assert_eq!(shape.valid_dir_structure(path), want, "path {path:?}");
        }
    }

    #[test]
    fn directory_mode_counts_levels_only() {
        let shape = ShardShape::DEFAULT;
        assert!(shape.valid_dir_structure("/ab/cd/ef/"));
        assert!(shape.valid_dir_structure("ab//cd/ef/"));
        assert!(!shape.valid_dir_structure("/ab/cd/"));
        assert!(!shape.valid_dir_structure("/ab/cd/ef/gh/"));
        assert!(!shape.valid_dir_structure("/ab/cd/efg/"));
        assert!(!shape.valid_dir_structure(""));
    }

    #[test]
    fn filename_length_is_unconstrained() {
        let shape = ShardShape::DEFAULT;
        assert!(shape.valid_dir_structure("bb/bb/bb/x.sia"));
        assert!(shape.valid_dir_structure("bb/bb/bb/0123456789abcdef0123456789.sia"));
    }

    #[test]
    fn dot_dot_is_resolved_before_counting() {
        let shape = ShardShape::new(2, 2).unwrap();
        assert!(shape.valid_dir_structure("/aa/zz/../aa/name"));
        assert!(!shape.valid_dir_structure("/aa/../name"));
    }

    #[test]
    fn dot_dot_above_root_is_dropped_only_when_rooted() {
        let shape = ShardShape::new(2, 2).unwrap();
        assert!(shape.valid_dir_structure("/../aa/aa/name"));
        assert!(shape.valid_dir_structure("/../../aa/aa/name"));
        assert!(!shape.valid_dir_structure("../aa/aa/name"));
    }
}
