//! `[source]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [source]
//! dir = "docs"                   # Document root; ids are relative to it
//! markdown = ["md", "markdown"]  # Rendered with the markdown adapter
//! trees = ["json"]               # Pre-rendered node trees
//! exclude = ["_build"]           # Directory names skipped while walking
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Document root directory.
    pub dir: PathBuf,

    /// File extensions handled by the markdown adapter.
    pub markdown: Vec<String>,

    /// File extensions holding serialized node trees.
    pub trees: Vec<String>,

    /// Directory names skipped during discovery.
    pub exclude: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: "docs".into(),
            markdown: vec!["md".into(), "markdown".into()],
            trees: vec!["json".into()],
            exclude: vec!["_build".into()],
        }
    }
}

impl SourceConfig {
    pub const DIR: FieldPath = FieldPath::new("source.dir");
    pub const MARKDOWN: FieldPath = FieldPath::new("source.markdown");
    pub const TREES: FieldPath = FieldPath::new("source.trees");

    /// Lowercase extensions and drop any leading dot (`.MD` -> `md`).
    pub fn normalize_extensions(&mut self) {
        for ext in self.markdown.iter_mut().chain(self.trees.iter_mut()) {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
    }

    pub fn is_excluded(&self, dir_name: &str) -> bool {
        self.exclude.iter().any(|e| e == dir_name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.dir.is_dir() {
            diag.error_with_hint(
                Self::DIR,
                format!("`{}` is not a directory", self.dir.display()),
                "point `dir` at the folder holding the documents, or pass `--source`",
            );
        }

        if self.markdown.is_empty() && self.trees.is_empty() {
            diag.error(Self::MARKDOWN, "no document extensions configured");
        }

        for ext in &self.markdown {
            if self.trees.contains(ext) {
                diag.error(
                    Self::TREES,
                    format!("extension `{ext}` is listed as both markdown and tree"),
                );
            }
        }
    }
}
