//! Platform-specific path utilities

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Path helpers over repository-relative strings, zero allocation where possible
pub struct PathUtil;

impl PathUtil {
    /// Final path component, accepting either separator
    #[inline]
    pub fn basename(path: &str) -> &str {
        path.rsplit(['/', '\\']).next().unwrap_or(path)
    }

    /// Basename without its last extension (`Main.java` -> `Main`)
    #[inline]
    pub fn stem(path: &str) -> &str {
        let base = Self::basename(path);
        match base.rfind('.') {
            Some(0) | None => base,
            Some(i) => &base[..i],
        }
    }

    /// Convert path to POSIX format (forward slashes)
    ///
    /// Returns borrowed when there is nothing to replace.
    #[inline]
    pub fn to_posix(path: &str) -> Cow<'_, str> {
        if path.contains('\\') {
            Cow::Owned(path.replace('\\', "/"))
        } else {
            Cow::Borrowed(path)
        }
    }

    /// Resolve a repository-relative path against the repository root
    pub fn in_repo(repo_root: &Path, relative: &str) -> PathBuf {
        let mut out = repo_root.to_path_buf();
        for part in relative.split(['/', '\\']).filter(|s| !s.is_empty()) {
            out.push(part);
        }
        out
    }

    /// Parent directory of a path, `.` when there is none
    pub fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}
