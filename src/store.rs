//! Document metadata store.
//!
//! Holds, per document, the anchors it defines and the local references it
//! emits. Entries are inserted exactly once during the collection phase and
//! only read afterwards.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::{Anchor, DocumentId, Reference, XrefError};

/// What the early pass learned about one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Anchors declared by the document.
    pub anchors: FxHashSet<Anchor>,
    /// Local references in document order (duplicates kept).
    pub references: Vec<Reference>,
}

impl DocumentMetadata {
    pub fn new(anchors: FxHashSet<Anchor>, references: Vec<Reference>) -> Self {
        Self {
            anchors,
            references,
        }
    }

    #[inline]
    pub fn has_anchor(&self, anchor: &str) -> bool {
        self.anchors.contains(anchor)
    }

    /// Anchors in lexical order, for stable output.
    pub fn sorted_anchors(&self) -> Vec<&str> {
        let mut anchors: Vec<_> = self.anchors.iter().map(String::as_str).collect();
        anchors.sort_unstable();
        anchors
    }
}

/// Metadata for every document collected in the current build.
#[derive(Debug, Default)]
pub struct MetadataStore {
    entries: FxHashMap<DocumentId, DocumentMetadata>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document's metadata.
    ///
    /// A second registration for the same id is an orchestration bug and
    /// fails instead of overwriting.
    pub fn put(
        &mut self,
        document: DocumentId,
        anchors: FxHashSet<Anchor>,
        references: Vec<Reference>,
    ) -> Result<(), XrefError> {
        if self.entries.contains_key(&document) {
            return Err(XrefError::DuplicateRegistration { document });
        }
        self.entries
            .insert(document, DocumentMetadata::new(anchors, references));
        Ok(())
    }

    #[inline]
    pub fn get(&self, document: &DocumentId) -> Option<&DocumentMetadata> {
        self.entries.get(document)
    }

    #[inline]
    pub fn contains(&self, document: &DocumentId) -> bool {
        self.entries.contains_key(document)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by document id.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &DocumentMetadata)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }

    /// Total number of anchors across all documents.
    pub fn anchor_count(&self) -> usize {
        self.entries.values().map(|m| m.anchors.len()).sum()
    }

    /// Total number of local references across all documents.
    pub fn reference_count(&self) -> usize {
        self.entries.values().map(|m| m.references.len()).sum()
    }
}
