//! Filesystem path normalization.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `resolve_path` - resolve a relative path against a base directory

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a configured path against the directory holding `manref.toml`.
///
/// Absolute paths are kept; relative ones are joined onto `base_dir`.
/// Always returns an absolute path.
///
/// # Example
/// ```ignore
/// // [source] dir = "docs" in /repo/manref.toml
/// let docs = resolve_path(Path::new("docs"), Path::new("/repo"));
/// assert_eq!(docs, PathBuf::from("/repo/docs"));
/// ```
#[inline]
pub fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    normalize_path(&base_dir.join(path))
}

/// Path of `file` relative to `root`, if `file` lives under it.
pub fn relative_id_path<'a>(file: &'a Path, root: &Path) -> Option<&'a Path> {
    file.strip_prefix(root).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.md"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_path_absolute() {
        let resolved = resolve_path(Path::new("/absolute/docs"), Path::new("/base"));
        assert_eq!(resolved, PathBuf::from("/absolute/docs"));
    }

    #[test]
    fn test_resolve_path_relative_to_base() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();

        let resolved = resolve_path(Path::new("docs"), dir.path());
        assert_eq!(resolved, normalize_path(&dir.path().join("docs")));

        // Missing directories still resolve under the base
        let missing = resolve_path(Path::new("_build/xref"), Path::new("/base"));
        assert_eq!(missing, PathBuf::from("/base/_build/xref"));
    }

    #[test]
    fn test_relative_id_path() {
        let root = Path::new("/repo/docs");
        assert_eq!(
            relative_id_path(Path::new("/repo/docs/guide/intro.md"), root),
            Some(Path::new("guide/intro.md"))
        );
        assert_eq!(relative_id_path(Path::new("/elsewhere/a.md"), root), None);
    }
}
