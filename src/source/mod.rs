//! Host adapters: files on disk to neutral document trees.
//!
//! | Module     | Input                         | Crate           |
//! |------------|-------------------------------|-----------------|
//! | `markdown` | Markdown source               | `pulldown-cmark`|
//! | `tree`     | Pre-rendered JSON node tree   | `serde_json`    |
//! | `discover` | Source directory walk + load  | `jwalk`, `rayon`|

mod discover;
mod markdown;
mod tree;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::SourceConfig;
use crate::core::DocumentId;
use crate::tree::SourceDocument;
use crate::utils::path::relative_id_path;

pub use discover::load_documents;
pub use markdown::{MarkdownOptions, from_markdown};
pub use tree::from_json;

/// Errors raised while turning a source file into a document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("`{0}` is not a valid document tree")]
    InvalidTree(PathBuf, #[source] serde_json::Error),

    #[error("`{0}` has no recognised document extension")]
    Unsupported(PathBuf),

    #[error("`{0}` does not map to a document id")]
    EmptyId(PathBuf),

    #[error("`{0}` is outside the source directory `{1}`")]
    OutsideRoot(PathBuf, PathBuf),
}

/// How a source file becomes a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Markdown, converted with pulldown-cmark
    Markdown,
    /// Node tree serialized as JSON
    Tree,
}

impl ContentKind {
    pub const ALL: [Self; 2] = [Self::Markdown, Self::Tree];

    /// Detect content kind from the configured extension lists.
    pub fn from_extension(ext: &str, config: &SourceConfig) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if config.markdown.contains(&ext) {
            Some(Self::Markdown)
        } else if config.trees.contains(&ext) {
            Some(Self::Tree)
        } else {
            None
        }
    }

    /// Detect content kind from file path.
    pub fn from_path(path: &Path, config: &SourceConfig) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| Self::from_extension(e, config))
    }

    /// Display name for this content kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Tree => "tree",
        }
    }
}

/// Read one source file into a document.
///
/// The id is the file path relative to the source root, extension
/// stripped: `docs/guide/intro.md` -> `guide/intro`.
pub fn load_document(path: &Path, config: &SourceConfig) -> Result<SourceDocument, SourceError> {
    let kind = ContentKind::from_path(path, config)
        .ok_or_else(|| SourceError::Unsupported(path.to_path_buf()))?;

    let relative = relative_id_path(path, &config.dir)
        .ok_or_else(|| SourceError::OutsideRoot(path.to_path_buf(), config.dir.clone()))?;
    let id = DocumentId::from_source_path(relative)
        .ok_or_else(|| SourceError::EmptyId(path.to_path_buf()))?;

    let content =
        std::fs::read_to_string(path).map_err(|err| SourceError::Io(path.to_path_buf(), err))?;

    let tree = match kind {
        ContentKind::Markdown => from_markdown(&content, &MarkdownOptions::all()),
        ContentKind::Tree => {
            from_json(&content).map_err(|err| SourceError::InvalidTree(path.to_path_buf(), err))?
        }
    };

    Ok(SourceDocument::new(id, tree).with_path(path.to_path_buf()))
}
