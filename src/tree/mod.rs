//! Neutral document tree.
//!
//! A minimal node model (kind, attributes, children) that every host adapter
//! renders into. The collectors and the rewriter only ever see this tree, so
//! they can be exercised with hand-built documents.
//!
//! # JSON shape
//!
//! ```text
//! {"kind": "section", "ids": ["usage"], "children": [
//!     {"kind": "reference", "attrs": {"refuri": "hooks.md#python"},
//!      "children": [{"kind": "text", "value": "hooks"}]}
//! ]}
//! ```

mod walk;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::DocumentId;

/// Attribute carrying a hyperlink's target.
pub const REFURI: &str = "refuri";

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Root of a rendered document.
    Document,
    /// Section introduced by a heading; may carry several resolved ids.
    Section {
        #[serde(default)]
        ids: Vec<String>,
    },
    /// Raw markup passed through verbatim (HTML blocks, inline HTML).
    Raw { source: String },
    /// Hyperlink. The target lives in the `refuri` attribute.
    Reference,
    /// Plain text.
    Text { value: String },
    /// Any other structural element (paragraph, list, heading, ...).
    Element { tag: String },
}

/// One node of the neutral tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn document(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Document).with_children(children)
    }

    pub fn section<S: Into<String>>(ids: impl IntoIterator<Item = S>, children: Vec<Node>) -> Self {
        let ids = ids.into_iter().map(Into::into).collect();
        Self::new(NodeKind::Section { ids }).with_children(children)
    }

    pub fn raw(source: impl Into<String>) -> Self {
        Self::new(NodeKind::Raw {
            source: source.into(),
        })
    }

    /// Hyperlink to `refuri` with a single text child.
    pub fn reference(refuri: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(NodeKind::Reference)
            .with_attr(REFURI, refuri)
            .with_children(vec![Self::text(label)])
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Element { tag: tag.into() }).with_children(children)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[inline]
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[inline]
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, NodeKind::Reference)
    }

    /// Hyperlink target; `None` for non-hyperlinks and hyperlinks without one.
    #[inline]
    pub fn refuri(&self) -> Option<&str> {
        if self.is_reference() {
            self.attr(REFURI)
        } else {
            None
        }
    }

    /// Replace the hyperlink target, returning the previous one.
    pub fn set_refuri(&mut self, refuri: impl Into<String>) -> Option<String> {
        self.attrs.insert(REFURI.to_string(), refuri.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.descendants() {
            if let NodeKind::Text { value } = &node.kind {
                out.push_str(value);
            }
        }
        out
    }
}

/// A rendered document ready for the early pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: DocumentId,
    /// File the tree was produced from, if it came from disk.
    pub path: Option<PathBuf>,
    pub tree: Node,
}

impl SourceDocument {
    pub fn new(id: DocumentId, tree: Node) -> Self {
        Self {
            id,
            path: None,
            tree,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}
