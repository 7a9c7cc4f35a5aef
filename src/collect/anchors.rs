//! Anchor collection.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::core::Anchor;
use crate::tree::{Node, NodeKind};

// ASCII word boundary: `regex` is built without unicode-perl
static NAME_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?-u:\b)name=(?:"([^"]*)")?"#).unwrap());
static ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?-u:\b)id=(?:"([^"]*)")?"#).unwrap());

/// Every anchor a rendered document defines.
///
/// - raw nodes: one `name="..."` or `id="..."` value each
/// - section nodes: all of their ids
pub fn collect_anchors(tree: &Node) -> FxHashSet<Anchor> {
    let mut anchors = FxHashSet::default();

    for node in tree.descendants() {
        match &node.kind {
            NodeKind::Raw { source } => anchors.extend(raw_anchor(source)),
            NodeKind::Section { ids } => anchors.extend(ids.iter().cloned()),
            _ => {}
        }
    }

    anchors
}

/// Anchor declared by a raw markup fragment.
///
/// A fragment with a `name=` attribute is only searched for its quoted
/// value, even when that fails and an `id="..."` is present.
fn raw_anchor(source: &str) -> Option<Anchor> {
    let caps = NAME_ATTR
        .captures(source)
        .or_else(|| ID_ATTR.captures(source))?;
    caps.get(1)
        .map(|value| value.as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
