//! Common steps shared across CLI commands.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::XrefConfig;
use crate::resolve::{BuildContext, run_collection_phase};
use crate::source::load_documents;
use crate::utils::plural::plural_count;
use crate::{debug, debug_do, log};

/// Load every source document and run the collection phase over them.
///
/// `show_progress` draws a load counter on stderr while files are read.
pub fn collect_build(config: &XrefConfig, show_progress: bool) -> Result<BuildContext> {
    let source_dir = config.root_relative(&config.source.dir);
    let documents = load_documents(&config.source, show_progress)
        .with_context(|| format!("failed to load documents from {}", source_dir.display()))?;

    if documents.is_empty() {
        log!("warning"; "no documents found in {}", source_dir.display());
    }

    let context = run_collection_phase(documents, config.output.resolve_options())?;

    debug_do! {
        let store = context.store();
        debug!(
            "collect";
            "{} in {}: {}, {}",
            plural_count(store.len(), "document"),
            source_dir.display(),
            plural_count(store.anchor_count(), "anchor"),
            plural_count(store.reference_count(), "reference")
        );
    }

    Ok(context)
}

/// Serialize `value` as JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let file =
        fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_in;
    use crate::core::DocumentId;
    use tempfile::TempDir;

    #[test]
    fn test_collect_build() {
        let root = TempDir::with_prefix("manual").unwrap();
        let config = test_config_in(root.path());
        fs::write(config.source.dir.join("a.md"), "# A\n\n[b](b.md#x)\n").unwrap();
        fs::write(config.source.dir.join("b.md"), "## X\n").unwrap();

        let context = collect_build(&config, false).unwrap();
        let store = context.store();
        assert_eq!(store.len(), 2);
        let b = DocumentId::from_path("b").unwrap();
        assert!(store.get(&b).unwrap().has_anchor("x"));
        assert_eq!(store.reference_count(), 1);
    }

    #[test]
    fn test_write_json_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/value.json");

        write_json(&path, &serde_json::json!({"a": [1, 2]}), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":[1,2]}\n");
    }
}
