//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "_build/xref"       # Where `resolve` writes its results
//! extension = "html"        # Extension of rewritten hrefs
//! manifest = "links.json"   # Link manifest file name
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::resolve::{DEFAULT_EXTENSION, ResolveOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory.
    pub dir: PathBuf,

    /// Extension of the final `/<id>.<ext>` hrefs.
    pub extension: String,

    /// File name of the link manifest inside `dir`.
    pub manifest: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "_build/xref".into(),
            extension: DEFAULT_EXTENSION.into(),
            manifest: "links.json".into(),
        }
    }
}

impl OutputConfig {
    pub const DIR: FieldPath = FieldPath::new("output.dir");
    pub const EXTENSION: FieldPath = FieldPath::new("output.extension");
    pub const MANIFEST: FieldPath = FieldPath::new("output.manifest");

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::with_extension(&self.extension)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extension.is_empty() {
            diag.error_with_hint(
                Self::EXTENSION,
                "must not be empty",
                format!("use `extension = \"{DEFAULT_EXTENSION}\"`"),
            );
        } else if self.extension.contains(['.', '/', '#']) {
            diag.error_with_hint(
                Self::EXTENSION,
                format!("`{}` may not contain `.`, `/` or `#`", self.extension),
                "write the bare extension, e.g. `html`",
            );
        }

        if self.manifest.is_empty() || self.manifest.contains(['/', '\\']) {
            diag.error(
                Self::MANIFEST,
                format!("`{}` must be a plain file name", self.manifest),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.output.extension, "html");
        assert_eq!(config.output.manifest, "links.json");
        assert_eq!(config.output.resolve_options(), ResolveOptions::default());
    }

    #[test]
    fn test_extension_rules() {
        for (ext, ok) in [("html", true), ("htm", true), ("", false), (".html", false), ("a/b", false), ("x#y", false)] {
            let mut diag = ConfigDiagnostics::new();
            let output = OutputConfig {
                extension: ext.into(),
                ..OutputConfig::default()
            };
            output.validate(&mut diag);
            assert_eq!(diag.is_empty(), ok, "extension {ext:?}");
        }
    }

    #[test]
    fn test_manifest_must_be_file_name() {
        let mut diag = ConfigDiagnostics::new();
        let output = OutputConfig {
            manifest: "nested/links.json".into(),
            ..OutputConfig::default()
        };
        output.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, OutputConfig::MANIFEST);
    }
}
