//! Two-phase cross-reference resolution.
//!
//! ```text
//! run_collection_phase     every document: anchors + references -> store
//!          │
//!          ▼               (store complete)
//! run_validation_phase     every document: validate references, rewrite hrefs
//! ```
//!
//! A [`BuildContext`] owns the metadata store and the documents for exactly
//! one build. The single-document entry points (`collect_document`,
//! `validate_and_rewrite`) are what host callbacks call; the phase functions
//! drive them in the only order that is correct.

mod rewrite;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::collect::{collect_anchors, collect_references};
use crate::core::{DocumentId, XrefError};
use crate::debug;
use crate::store::MetadataStore;
use crate::tree::SourceDocument;

pub use rewrite::Rewrite;
use rewrite::{check_reference, rewrite_matching};

/// Default extension of rewritten hrefs.
pub const DEFAULT_EXTENSION: &str = "html";

/// Options shared by both phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Extension of the final `/<id>.<ext>` hrefs.
    pub extension: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ResolveOptions {
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

/// State of one build: the metadata store plus the documents it describes.
#[derive(Debug)]
pub struct BuildContext {
    options: ResolveOptions,
    store: MetadataStore,
    /// Documents in build order.
    documents: Vec<SourceDocument>,
    /// Document id -> index into `documents`.
    positions: FxHashMap<DocumentId, usize>,
}

impl BuildContext {
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            store: MetadataStore::new(),
            documents: Vec::new(),
            positions: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    #[inline]
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    #[inline]
    pub fn documents(&self) -> &[SourceDocument] {
        &self.documents
    }

    /// Early pass for one document ("document read").
    ///
    /// Records the document's anchors and local references and takes
    /// ownership of its tree for the late pass.
    pub fn collect_document(&mut self, document: SourceDocument) -> Result<(), XrefError> {
        let anchors = collect_anchors(&document.tree);
        let references = collect_references(&document.tree, &document.id)?;

        debug!(
            "collect";
            "{}: {} anchor(s), {} reference(s)",
            document.id,
            anchors.len(),
            references.len()
        );

        self.store.put(document.id.clone(), anchors, references)?;
        self.positions
            .insert(document.id.clone(), self.documents.len());
        self.documents.push(document);
        Ok(())
    }

    /// Late pass for one document ("document resolved").
    ///
    /// Re-checks every recorded reference against the store and rewrites the
    /// matching hyperlinks to their final href. Stops at the first dangling
    /// reference.
    pub fn validate_and_rewrite(&mut self, document: &DocumentId) -> Result<Vec<Rewrite>, XrefError> {
        let not_collected = || XrefError::NotCollected {
            document: document.clone(),
        };
        let metadata = self.store.get(document).ok_or_else(not_collected)?;
        let position = *self.positions.get(document).ok_or_else(not_collected)?;
        let tree = &mut self.documents[position].tree;

        let mut rewrites = Vec::new();
        for reference in &metadata.references {
            check_reference(&self.store, reference, document)?;
            let href = reference.href(&self.options.extension);
            rewrite_matching(tree, document, reference, &href, &mut rewrites);
        }

        for rewrite in &rewrites {
            debug!("rewrite"; "{}: {} -> {}", document, rewrite.from, rewrite.to);
        }
        Ok(rewrites)
    }

    /// Every dangling reference in the document set, in build order.
    ///
    /// Read-only: nothing is rewritten. Meant for reporting after the
    /// collection phase; the build itself stays fail-fast.
    pub fn dangling_references(&self) -> Vec<XrefError> {
        self.documents
            .iter()
            .filter_map(|doc| self.store.get(&doc.id).map(|meta| (&doc.id, meta)))
            .flat_map(|(id, meta)| {
                meta.references
                    .iter()
                    .filter_map(move |r| check_reference(&self.store, r, id).err())
            })
            .collect()
    }
}

/// A document after its late pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub document: SourceDocument,
    /// Hyperlinks whose target changed, in document order.
    pub rewrites: Vec<Rewrite>,
}

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub options: ResolveOptions,
    pub documents: Vec<ResolvedDocument>,
}

impl ResolvedBuild {
    pub fn rewrite_count(&self) -> usize {
        self.documents.iter().map(|d| d.rewrites.len()).sum()
    }

    /// Serializable summary of every document's rewritten links.
    pub fn manifest(&self) -> LinkManifest {
        let documents = self
            .documents
            .iter()
            .map(|resolved| ManifestEntry {
                id: resolved.document.id.clone(),
                href: resolved.document.id.href(&self.options.extension),
                links: resolved.rewrites.clone(),
            })
            .collect();
        LinkManifest { documents }
    }
}

/// `links.json` contents.
#[derive(Debug, Clone, Serialize)]
pub struct LinkManifest {
    pub documents: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub id: DocumentId,
    pub href: String,
    pub links: Vec<Rewrite>,
}

/// Run the early pass for every document, in order.
///
/// The returned context holds a complete store; no late pass has run yet.
pub fn run_collection_phase(
    documents: impl IntoIterator<Item = SourceDocument>,
    options: ResolveOptions,
) -> Result<BuildContext, XrefError> {
    let mut context = BuildContext::new(options);
    for document in documents {
        context.collect_document(document)?;
    }
    Ok(context)
}

/// Run the late pass for every document, failing on the first dangling
/// reference.
pub fn run_validation_phase(mut context: BuildContext) -> Result<ResolvedBuild, XrefError> {
    let ids: Vec<DocumentId> = context.documents.iter().map(|d| d.id.clone()).collect();

    let mut rewrites = Vec::with_capacity(ids.len());
    for id in &ids {
        rewrites.push(context.validate_and_rewrite(id)?);
    }

    let documents = context
        .documents
        .into_iter()
        .zip(rewrites)
        .map(|(document, rewrites)| ResolvedDocument { document, rewrites })
        .collect();

    Ok(ResolvedBuild {
        options: context.options,
        documents,
    })
}
