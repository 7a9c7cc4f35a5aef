//! Reference validation and in-place href rewriting.

use serde::Serialize;

use crate::collect::is_local_target;
use crate::core::{DocumentId, Reference, XrefError, normalize};
use crate::store::MetadataStore;
use crate::tree::Node;

/// One hyperlink whose target was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    /// Target as written by the author.
    pub from: String,
    /// Final absolute href.
    pub to: String,
}

/// Check that a reference points at an existing document and anchor.
pub(super) fn check_reference(
    store: &MetadataStore,
    reference: &Reference,
    referenced_from: &DocumentId,
) -> Result<(), XrefError> {
    let Some(target) = store.get(&reference.document) else {
        return Err(XrefError::UnresolvedDocument {
            target: reference.document.clone(),
            referenced_from: referenced_from.clone(),
        });
    };

    if let Some(anchor) = &reference.anchor
        && !target.has_anchor(anchor)
    {
        return Err(XrefError::UnresolvedAnchor {
            target: reference.document.clone(),
            anchor: anchor.clone(),
            referenced_from: referenced_from.clone(),
        });
    }

    Ok(())
}

/// Point every hyperlink that normalizes to `reference` at `href`.
///
/// Matching re-normalizes each hyperlink's current target, which is stable
/// because normalization is idempotent: an already rewritten href normalizes
/// to the same reference and is left as is.
pub(super) fn rewrite_matching(
    tree: &mut Node,
    current: &DocumentId,
    reference: &Reference,
    href: &str,
    rewrites: &mut Vec<Rewrite>,
) {
    tree.walk_mut(&mut |node| {
        let matches = match node.refuri() {
            Some(uri) if uri != href && is_local_target(uri) => {
                normalize(uri, Some(current)).is_ok_and(|r| r == *reference)
            }
            _ => false,
        };

        if matches && let Some(from) = node.set_refuri(href) {
            rewrites.push(Rewrite {
                from,
                to: href.to_string(),
            });
        }
    });
}
