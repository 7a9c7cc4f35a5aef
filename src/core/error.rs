//! Cross-reference errors.
//!
//! Every variant is build-stopping. There are no warnings in this taxonomy.

use thiserror::Error;

use super::DocumentId;

/// Errors raised while collecting, validating or rewriting references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XrefError {
    /// The raw link target cannot be turned into a `(document, anchor)` pair.
    #[error("malformed reference '{uri}': {reason}")]
    MalformedReference { uri: String, reason: String },

    /// The target document is not part of the document set.
    #[error("document '{target}' is referenced from '{referenced_from}', but it could not be found")]
    UnresolvedDocument {
        target: DocumentId,
        referenced_from: DocumentId,
    },

    /// The target document exists but does not declare the anchor.
    #[error(
        "section '{target}#{anchor}' is referenced from '{referenced_from}', but it could not be found"
    )]
    UnresolvedAnchor {
        target: DocumentId,
        anchor: String,
        referenced_from: DocumentId,
    },

    /// The metadata store saw the same document twice.
    #[error("document '{document}' was registered twice")]
    DuplicateRegistration { document: DocumentId },

    /// Late pass requested for a document that skipped the early pass.
    #[error("document '{document}' has no collected metadata (collection phase not run)")]
    NotCollected { document: DocumentId },
}

impl XrefError {
    /// Document the failing link lives in, for dangling references.
    pub fn referenced_from(&self) -> Option<&DocumentId> {
        match self {
            Self::UnresolvedDocument {
                referenced_from, ..
            }
            | Self::UnresolvedAnchor {
                referenced_from, ..
            } => Some(referenced_from),
            _ => None,
        }
    }

    /// Whether this error is a dangling link in the documents themselves
    /// (as opposed to a tool or orchestration bug).
    pub const fn is_dangling(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedDocument { .. } | Self::UnresolvedAnchor { .. }
        )
    }
}
