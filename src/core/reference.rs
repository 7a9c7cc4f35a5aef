//! Reference normalization.
//!
//! Turns loosely-formed link targets (`hooks.md#python`, `#usage`,
//! `/usage/cli`) into canonical `(document, anchor)` pairs.

use std::fmt;

use super::{DocumentId, XrefError};
use crate::utils::path::route::split_path_fragment;

/// Extension used by [`Reference::canonical_form`].
pub const CANONICAL_EXTENSION: &str = "html";

/// A resolved (document, optional anchor) pair for one local hyperlink.
///
/// `anchor == None` targets the document as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub document: DocumentId,
    pub anchor: Option<String>,
}

impl Reference {
    pub fn new(document: DocumentId, anchor: Option<impl Into<String>>) -> Self {
        Self {
            document,
            anchor: anchor.map(Into::into),
        }
    }

    /// Final absolute href: `/<document>.<ext>` plus `#<anchor>` if any.
    pub fn href(&self, extension: &str) -> String {
        let mut href = self.document.href(extension);
        if let Some(anchor) = &self.anchor {
            href.push('#');
            href.push_str(anchor);
        }
        href
    }

    /// Canonical string form; normalizing it yields this reference again.
    pub fn canonical_form(&self) -> String {
        self.href(CANONICAL_EXTENSION)
    }
}

/// `document` or `document#anchor`, as used in error messages.
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.anchor {
            Some(anchor) => write!(f, "{}#{}", self.document, anchor),
            None => write!(f, "{}", self.document),
        }
    }
}

/// Normalize a raw link target in the context of the current document.
///
/// - The part before the first `#` is the target path, the rest the anchor
/// - An empty path (after stripping leading `/`) means the current document
/// - A path starting with `./` or `../` is relative to the current
///   document's directory; any other path is relative to the source root
/// - An empty anchor (`doc#`) means no anchor
///
/// Fails with [`XrefError::MalformedReference`] for a self or relative
/// reference when no current document is supplied, and for a relative path
/// that climbs above the source root.
pub fn normalize(uri: &str, current: Option<&DocumentId>) -> Result<Reference, XrefError> {
    let (path, anchor) = split_path_fragment(uri);
    let anchor = Some(anchor).filter(|a| !a.is_empty());
    let malformed = |reason: &str| XrefError::MalformedReference {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let document = if is_relative(path) {
        let current = current.ok_or_else(|| malformed("relative reference needs a current document"))?;
        let joined = join_relative(current, path)
            .ok_or_else(|| malformed("relative path leaves the source root"))?;
        DocumentId::from_path(&joined).ok_or_else(|| malformed("relative path names no document"))?
    } else if path.trim_start_matches('/').is_empty() {
        current
            .cloned()
            .ok_or_else(|| malformed("self reference needs a current document"))?
    } else {
        DocumentId::from_path(path).ok_or_else(|| malformed("path names no document"))?
    };

    Ok(Reference::new(document, anchor))
}

fn is_relative(path: &str) -> bool {
    matches!(path, "." | "..") || path.starts_with("./") || path.starts_with("../")
}

/// Resolve `./` and `../` segments against the directory of `current`.
///
/// Returns `None` when `..` climbs above the source root.
fn join_relative(current: &DocumentId, path: &str) -> Option<String> {
    let mut segments: Vec<&str> = current.as_str().split('/').collect();
    segments.pop();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        DocumentId::from_path(s).unwrap()
    }

    fn reference(doc: &str, anchor: Option<&str>) -> Reference {
        Reference::new(id(doc), anchor)
    }

    #[test]
    fn test_cross_document() {
        let current = id("index");
        assert_eq!(
            normalize("hooks.md#python", Some(&current)).unwrap(),
            reference("hooks", Some("python"))
        );
        assert_eq!(
            normalize("/usage/cli", Some(&current)).unwrap(),
            reference("usage/cli", None)
        );
    }

    #[test]
    fn test_self_reference() {
        let current = id("usage/cli");
        assert_eq!(
            normalize("#options", Some(&current)).unwrap(),
            reference("usage/cli", Some("options"))
        );
        assert_eq!(
            normalize("", Some(&current)).unwrap(),
            reference("usage/cli", None)
        );
        assert_eq!(
            normalize("/#options", Some(&current)).unwrap(),
            reference("usage/cli", Some("options"))
        );
    }

    #[test]
    fn test_empty_anchor_is_none() {
        let current = id("index");
        assert_eq!(
            normalize("hooks#", Some(&current)).unwrap(),
            reference("hooks", None)
        );
        assert_eq!(
            normalize("#", Some(&current)).unwrap(),
            reference("index", None)
        );
    }

    #[test]
    fn test_only_first_hash_splits() {
        let current = id("index");
        assert_eq!(
            normalize("a#b#c", Some(&current)).unwrap(),
            reference("a", Some("b#c"))
        );
    }

    #[test]
    fn test_self_reference_without_context() {
        for uri in ["#options", "", "/"] {
            let err = normalize(uri, None).unwrap_err();
            assert!(
                matches!(err, XrefError::MalformedReference { .. }),
                "expected malformed reference for {uri:?}"
            );
        }
        // Non-empty paths don't need a current document
        assert_eq!(
            normalize("hooks.md", None).unwrap(),
            reference("hooks", None)
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_current_directory() {
        let current = id("guide/intro");
        assert_eq!(
            normalize("./usage.md#x", Some(&current)).unwrap(),
            reference("guide/usage", Some("x"))
        );
        assert_eq!(
            normalize("../faq.md", Some(&current)).unwrap(),
            reference("faq", None)
        );
        // Plain paths stay relative to the source root
        assert_eq!(
            normalize("usage.md", Some(&current)).unwrap(),
            reference("usage", None)
        );
    }

    #[test]
    fn test_relative_path_errors() {
        assert!(matches!(
            normalize("../../outside.md", Some(&id("guide/intro"))),
            Err(XrefError::MalformedReference { .. })
        ));
        assert!(matches!(
            normalize("./usage.md", None),
            Err(XrefError::MalformedReference { .. })
        ));
        assert!(matches!(
            normalize("../#top", Some(&id("guide"))),
            Err(XrefError::MalformedReference { .. })
        ));
        assert!(matches!(
            normalize("/./hooks.md", Some(&id("guide/intro"))),
            Err(XrefError::MalformedReference { .. })
        ));
    }

    #[test]
    fn test_round_trip() {
        let current = id("guide/intro");
        for uri in [
            "hooks.md#python",
            "#see-also",
            "",
            "/v1.2/usage.md",
            "archive.tar.gz#top",
            "a#b#c",
            "./how-it-works",
            "../faq.md#top",
        ] {
            let first = normalize(uri, Some(&current)).unwrap();
            let again = normalize(&first.canonical_form(), Some(&current)).unwrap();
            assert_eq!(first, again, "round trip failed for {uri:?}");
        }
    }

    #[test]
    fn test_idempotent_on_rewritten_href() {
        let current = id("index");
        let r = reference("usage/cli", Some("options"));
        assert_eq!(r.href("html"), "/usage/cli.html#options");
        assert_eq!(normalize(&r.href("htm"), Some(&current)).unwrap(), r);
    }

    #[test]
    fn test_display() {
        assert_eq!(reference("hooks", Some("go")).to_string(), "hooks#go");
        assert_eq!(reference("hooks", None).to_string(), "hooks");
    }
}
