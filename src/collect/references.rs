//! Local reference collection.

use crate::core::{DocumentId, LinkKind, Reference, XrefError, normalize};
use crate::tree::Node;

/// Whether a hyperlink target takes part in cross-reference resolution.
///
/// Empty targets and external targets (any URI scheme) are skipped.
#[inline]
pub fn is_local_target(uri: &str) -> bool {
    !uri.is_empty() && LinkKind::parse(uri).is_local()
}

/// Every local hyperlink of a rendered document, normalized, in document order.
///
/// Repeated links to the same target are kept; each occurrence is validated
/// and rewritten on its own.
pub fn collect_references(
    tree: &Node,
    current: &DocumentId,
) -> Result<Vec<Reference>, XrefError> {
    tree.descendants()
        .filter_map(Node::refuri)
        .filter(|uri| is_local_target(uri))
        .map(|uri| normalize(uri, Some(current)))
        .collect()
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
    fn test_external_links_ignored() {
        let tree = Node::document(vec![
            Node::reference("https://dredd.org/en/latest/", "docs"),
            Node::reference("http://example.com/hooks.md#x", "x"),
            Node::reference("mailto:support@example.com", "mail"),
            Node::reference("hooks.md", "hooks"),
        ]);
        let refs = collect_references(&tree, &id("index")).unwrap();
        assert_eq!(refs, vec![reference("hooks", None)]);
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let tree = Node::document(vec![
            Node::section(
                ["a"],
                vec![
                    Node::reference("b.md#two", "b"),
                    Node::element("p", vec![Node::reference("#local", "here")]),
                ],
            ),
            Node::reference("b.md#two", "b again"),
        ]);
        let refs = collect_references(&tree, &id("a")).unwrap();
        assert_eq!(
            refs,
            vec![
                reference("b", Some("two")),
                reference("a", Some("local")),
                reference("b", Some("two")),
            ]
        );
    }

    #[test]
    fn test_empty_and_missing_targets_skipped() {
        let tree = Node::document(vec![
            Node::reference("", "empty"),
            Node::new(crate::tree::NodeKind::Reference),
        ]);
        assert!(collect_references(&tree, &id("a")).unwrap().is_empty());
    }

    #[test]
    fn test_is_local_target() {
        assert!(is_local_target("#x"));
        assert!(is_local_target("how-it-works.md"));
        assert!(!is_local_target(""));
        assert!(!is_local_target("https://example.com"));
    }
}
