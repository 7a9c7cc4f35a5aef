//! Pre-rendered node trees serialized as JSON.
//!
//! An external renderer can hand its output to the resolver in the neutral
//! tree shape (see [`crate::tree`]). A root that is not a `document` node is
//! wrapped in one.

use crate::tree::{Node, NodeKind};

/// Parse a JSON node tree.
pub fn from_json(content: &str) -> Result<Node, serde_json::Error> {
    let node: Node = serde_json::from_str(content)?;
    Ok(match node.kind {
        NodeKind::Document => node,
        _ => Node::document(vec![node]),
    })
}
