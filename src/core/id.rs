//! Document identifier type.
//!
//! The same id-forming rule is applied when a document is registered and
//! when a link target is normalized. Keeping both behind
//! [`normalize_document_path`] is what makes store lookups line up.

use std::fmt;
use std::path::{Component, Path};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Canonical, extension-free path of one document in the set.
///
/// Invariants:
/// - Never empty
/// - Slash-separated, no leading `/` or `./`
/// - Final component carries no file extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Arc<str>);

impl DocumentId {
    /// Form an id from a slash-separated document path.
    ///
    /// Returns `None` when nothing is left after normalization
    /// (e.g. `""`, `"/"`) and for relative paths (`./`, `../`), which only
    /// have a meaning next to a current document.
    pub fn from_path(path: &str) -> Option<Self> {
        let id = normalize_document_path(path);
        let relative = id == "." || id == ".." || id.starts_with("./") || id.starts_with("../");
        if id.is_empty() || relative {
            None
        } else {
            Some(Self(Arc::from(id)))
        }
    }

    /// Form an id from a file path relative to the source root.
    ///
    /// Platform separators are folded into `/` before the shared rule runs.
    pub fn from_source_path(relative: &Path) -> Option<Self> {
        let joined = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self::from_path(&joined)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute site-root href of this document: `/guide/intro.html`.
    pub fn href(&self, extension: &str) -> String {
        format!("/{}.{}", self.0, extension)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip leading `/`, then the file extension.
///
/// Relative `./` and `../` paths are resolved by [`super::normalize`]
/// before they reach this rule.
///
/// # Examples
/// ```ignore
/// normalize_document_path("/guide/intro.md") -> "guide/intro"
/// normalize_document_path("v1.2/usage")      -> "v1.2/usage"
/// normalize_document_path(".hidden")         -> ".hidden"
/// ```
pub fn normalize_document_path(path: &str) -> &str {
    strip_extension(path.trim_start_matches('/'))
}

/// Remove the last `.suffix` of the final path component.
///
/// Leading dots of the component never start an extension.
fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    let stem_start = name_start + (name.len() - name.trim_start_matches('.').len());

    match path[stem_start..].rfind('.') {
        Some(dot) => &path[..stem_start + dot],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_strips_slash_and_extension() {
        assert_eq!(normalize_document_path("/guide/intro.md"), "guide/intro");
        assert_eq!(normalize_document_path("guide/intro.md"), "guide/intro");
        assert_eq!(normalize_document_path("//intro"), "intro");
    }

    #[test]
    fn test_normalize_only_last_component_extension() {
        assert_eq!(normalize_document_path("v1.2/usage"), "v1.2/usage");
        assert_eq!(normalize_document_path("v1.2/usage.md"), "v1.2/usage");
        assert_eq!(normalize_document_path("archive.tar.gz"), "archive.tar");
    }

    #[test]
    fn test_normalize_leading_dots() {
        assert_eq!(normalize_document_path(".hidden"), ".hidden");
        assert_eq!(normalize_document_path("docs/.hidden.md"), "docs/.hidden");
    }

    #[test]
    fn test_from_path_empty() {
        assert!(DocumentId::from_path("").is_none());
        assert!(DocumentId::from_path("/").is_none());
        assert!(DocumentId::from_path("./").is_none());
    }

    #[test]
    fn test_from_path_rejects_relative() {
        assert!(DocumentId::from_path("./usage.md").is_none());
        assert!(DocumentId::from_path("../faq").is_none());
        assert!(DocumentId::from_path("..").is_none());
    }

    #[test]
    fn test_from_source_path_matches_link_rule() {
        let from_file = DocumentId::from_source_path(&PathBuf::from("hooks").join("go.md"));
        let from_link = DocumentId::from_path("/hooks/go.md");
        assert_eq!(from_file, from_link);
        assert_eq!(from_file.unwrap().as_str(), "hooks/go");
    }

    #[test]
    fn test_href() {
        let id = DocumentId::from_path("usage/cli.md").unwrap();
        assert_eq!(id.href("html"), "/usage/cli.html");
        assert_eq!(id.to_string(), "usage/cli");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = DocumentId::from_path("usage/cli.md").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""usage/cli""#);
    }
}
