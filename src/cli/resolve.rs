//! `manref resolve`: rewrite every reference and write the results.
//!
//! ```text
//! <output>/links.json        manifest of every rewritten link
//! <output>/<id>.json         rewritten tree per document (--trees)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use rayon::prelude::*;

use super::common::{collect_build, write_json};
use crate::config::XrefConfig;
use crate::core::DocumentId;
use crate::log;
use crate::resolve::{ResolvedBuild, run_validation_phase};
use crate::utils::plural::plural_count;

/// Run both phases and write the manifest (and trees, if asked).
pub fn resolve_references(config: &XrefConfig, trees: bool) -> Result<()> {
    let context = collect_build(config, true)?;
    let resolved = run_validation_phase(context)?;

    log!(
        "resolve";
        "rewrote {} in {}",
        plural_count(resolved.rewrite_count(), "link"),
        plural_count(resolved.documents.len(), "document")
    );

    let written = write_outputs(config, &resolved, trees)?;
    log!(
        "resolve";
        "wrote {} to {}",
        plural_count(written, "file"),
        config.root_relative(&config.output.dir).display()
    );
    Ok(())
}

/// Write the outputs of a resolved build; returns the number of files.
fn write_outputs(config: &XrefConfig, resolved: &ResolvedBuild, trees: bool) -> Result<usize> {
    let manifest_path = config.output.manifest_path();

    if trees
        && let Some(clash) = resolved
            .documents
            .iter()
            .find(|doc| tree_path(&config.output.dir, &doc.document.id) == manifest_path)
    {
        bail!(
            "tree of document '{}' would overwrite the manifest {}",
            clash.document.id,
            config.output.manifest
        );
    }

    write_json(&manifest_path, &resolved.manifest(), true)?;
    if !trees {
        return Ok(1);
    }

    resolved.documents.par_iter().try_for_each(|doc| {
        write_json(
            &tree_path(&config.output.dir, &doc.document.id),
            &doc.document.tree,
            false,
        )
    })?;
    Ok(1 + resolved.documents.len())
}

/// `<output>/guide/intro.json` for document `guide/intro`.
fn tree_path(output_dir: &Path, id: &DocumentId) -> PathBuf {
    output_dir.join(format!("{id}.json"))
}
