//! `manref query`: print the metadata store as JSON.
//!
//! Only the collection phase runs, so a manual with dangling references can
//! still be inspected.

use std::path::Path;

use anyhow::{Result, anyhow};
use serde::Serialize;

use super::common::{collect_build, write_json};
use crate::cli::args::QueryArgs;
use crate::config::XrefConfig;
use crate::core::DocumentId;
use crate::log;
use crate::resolve::BuildContext;
use crate::utils::path::{normalize_path, relative_id_path};
use crate::utils::plural::plural_count;

/// Anchors and references of one document.
#[derive(Debug, Serialize)]
pub struct DocumentQueryResult {
    pub id: DocumentId,
    /// Source file relative to the project root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub anchors: Vec<String>,
    pub references: Vec<ReferenceQueryResult>,
}

#[derive(Debug, Serialize)]
pub struct ReferenceQueryResult {
    /// `document` or `document#anchor`
    pub target: String,
    /// Href the reference would be rewritten to.
    pub href: String,
}

/// Execute query command
pub fn run_query(args: &QueryArgs, config: &XrefConfig) -> Result<()> {
    let context = collect_build(config, true)?;
    let results = query_documents(&context, &args.documents, config)?;

    match &args.write {
        Some(path) => {
            write_json(path, &results, args.pretty)?;
            log!(
                "query";
                "wrote {} to {}",
                plural_count(results.len(), "document"),
                path.display()
            );
        }
        None if args.pretty => println!("{}", serde_json::to_string_pretty(&results)?),
        None => println!("{}", serde_json::to_string(&results)?),
    }
    Ok(())
}

/// Build query results for the selected documents, or all of them.
fn query_documents(
    context: &BuildContext,
    selectors: &[String],
    config: &XrefConfig,
) -> Result<Vec<DocumentQueryResult>> {
    let selected = selectors
        .iter()
        .map(|selector| {
            select_document(selector, &config.source.dir)
                .filter(|id| context.store().contains(id))
                .ok_or_else(|| anyhow!("no document matches '{selector}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let extension = &context.options().extension;
    let results = context
        .documents()
        .iter()
        .filter(|doc| selected.is_empty() || selected.contains(&doc.id))
        .filter_map(|doc| {
            let meta = context.store().get(&doc.id)?;
            Some(DocumentQueryResult {
                id: doc.id.clone(),
                path: doc
                    .path
                    .as_ref()
                    .map(|p| config.root_relative(p).display().to_string()),
                anchors: meta.sorted_anchors().into_iter().map(String::from).collect(),
                references: meta
                    .references
                    .iter()
                    .map(|r| ReferenceQueryResult {
                        target: r.to_string(),
                        href: r.href(extension),
                    })
                    .collect(),
            })
        })
        .collect();
    Ok(results)
}

/// Map a selector to a document id.
///
/// An existing file is taken relative to the source directory; anything
/// else is read as an id (`guide/intro`, `guide/intro.md`).
fn select_document(selector: &str, source_dir: &Path) -> Option<DocumentId> {
    let path = Path::new(selector);
    if path.is_file() {
        let file = normalize_path(path);
        return relative_id_path(&file, source_dir).and_then(DocumentId::from_source_path);
    }
    DocumentId::from_path(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_in;
    use std::fs;
    use tempfile::TempDir;

    fn manual() -> (TempDir, XrefConfig, BuildContext) {
        let root = TempDir::with_prefix("manual").unwrap();
        let config = test_config_in(root.path());
        fs::create_dir_all(config.source.dir.join("guide")).unwrap();
        fs::write(
            config.source.dir.join("guide/intro.md"),
            "# Intro\n\n## Usage {#use}\n\n[cli](/cli.md#flags) [missing](/nope.md)\n",
        )
        .unwrap();
        fs::write(config.source.dir.join("cli.md"), "# CLI\n\n## Flags\n").unwrap();

        let context = collect_build(&config, false).unwrap();
        (root, config, context)
    }

    #[test]
    fn test_query_all_documents() {
        let (_root, config, context) = manual();
        let results = query_documents(&context, &[], &config).unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["cli", "guide/intro"]);

        let intro = &results[1];
        assert_eq!(intro.path.as_deref(), Some("docs/guide/intro.md"));
        assert_eq!(intro.anchors, ["intro", "use"]);
        assert_eq!(intro.references[0].target, "cli#flags");
        assert_eq!(intro.references[0].href, "/cli.html#flags");
        // Dangling references are still listed
        assert_eq!(intro.references[1].target, "nope");
    }

    #[test]
    fn test_query_selectors() {
        let (_root, config, context) = manual();

        let by_id = query_documents(&context, &["guide/intro.md".into()], &config).unwrap();
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id.as_str(), "guide/intro");

        let file = config.source.dir.join("cli.md").display().to_string();
        let by_path = query_documents(&context, &[file], &config).unwrap();
        assert_eq!(by_path[0].id.as_str(), "cli");

        assert!(query_documents(&context, &["unknown".into()], &config).is_err());
    }

    #[test]
    fn test_query_json_shape() {
        let (_root, config, context) = manual();
        let results = query_documents(&context, &["cli".into()], &config).unwrap();

        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json[0]["id"], "cli");
        assert_eq!(json[0]["anchors"], serde_json::json!(["cli", "flags"]));
        assert_eq!(json[0]["references"], serde_json::json!([]));
    }
}
