//! Logical template paths ("/partials/greet.html") and their mapping
//! onto the local file system.

use std::path::{Path, PathBuf};


pub fn path_append<P: AsRef<Path>>(base: &Path, rel: &P) -> PathBuf {
    let mut p = PathBuf::from(base);
    p.push(rel);
    p
}

/// Careful, this drops any empty segments, regardless whether at the
/// beginning, end or in the middle.
pub fn path_segments<'s>(s: &'s str) -> impl Iterator<Item = &'s str>
{
    s.split('/').filter(|s| !s.is_empty())
}

/// Drop one leading `/`, if present.
pub fn strip_leading_slash(s: &str) -> &str {
    s.strip_prefix('/').unwrap_or(s)
}

/// Normalize a logical path to forward slashes with exactly one
/// leading slash stripped; this is the form used for lookups in
/// sources and pointer tables.
pub fn logical_path(s: &str) -> String {
    strip_leading_slash(&s.replace('\\', "/")).to_string()
}

/// Map a logical path below `root`. Does not allow escaping `root`:
/// `..` segments are dropped, as are `.` and empty ones.
pub fn map_path(root: &Path, logical: &str) -> PathBuf {
    let logical = logical.replace('\\', "/");
    let rel: PathBuf = path_segments(&logical)
        .filter(|s| *s != "." && *s != "..")
        .collect();
    path_append(root, &rel)
}
