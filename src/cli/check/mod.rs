//! `manref check`: validate every cross-reference without writing output.

mod report;

use anyhow::{Result, bail};
use rustc_hash::FxHashMap;

use super::common::collect_build;
use crate::config::XrefConfig;
use crate::core::DocumentId;
use crate::log;
use crate::resolve::{BuildContext, run_validation_phase};
use crate::utils::plural::plural_count;

use report::ValidationReport;

/// Run both phases and report the outcome.
pub fn check_references(config: &XrefConfig) -> Result<()> {
    let context = collect_build(config, true)?;
    check_context(context, config).map(|_| ())
}

/// Validate a collected build; returns the number of links that resolved.
///
/// Fails on the first dangling reference, or, with `keep_going`, after
/// printing all of them.
fn check_context(context: BuildContext, config: &XrefConfig) -> Result<usize> {
    log!("check"; "validating {}", plural_count(context.documents().len(), "document"));

    if config.validate.keep_going {
        let labels = document_labels(&context, config);
        let dangling = context.dangling_references();
        let report = ValidationReport::from_errors(&dangling, |id| {
            labels.get(id).cloned().unwrap_or_else(|| id.to_string())
        });

        if !report.is_empty() {
            report.print();
            log!("check"; "{}", report);
            bail!(
                "found {} in {}",
                plural_count(report.error_count(), "dangling reference"),
                plural_count(report.document_count(), "document")
            );
        }
    }

    let resolved = run_validation_phase(context)?;
    let links = resolved.rewrite_count();
    log!(
        "check";
        "{} across {} resolved",
        plural_count(links, "link"),
        plural_count(resolved.documents.len(), "document")
    );
    Ok(links)
}

/// Source path (relative to the project root) of every loaded document.
fn document_labels(context: &BuildContext, config: &XrefConfig) -> FxHashMap<DocumentId, String> {
    context
        .documents()
        .iter()
        .filter_map(|doc| {
            let path = doc.path.as_ref()?;
            Some((doc.id.clone(), config.root_relative(path).display().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::common::collect_build;
    use crate::config::test_config_in;
    use crate::core::XrefError;
    use std::fs;
    use tempfile::TempDir;

    fn manual(files: &[(&str, &str)]) -> (TempDir, XrefConfig) {
        let root = TempDir::with_prefix("manual").unwrap();
        let config = test_config_in(root.path());
        for (name, content) in files {
            fs::write(config.source.dir.join(name), content).unwrap();
        }
        (root, config)
    }

    #[test]
    fn test_check_passes() {
        let (_root, config) = manual(&[
            ("index.md", "# Index\n\n[usage](usage.md#hooks) and [top](#index)\n"),
            ("usage.md", "# Usage\n\n## Hooks\n"),
        ]);
        let context = collect_build(&config, false).unwrap();
        assert_eq!(check_context(context, &config).unwrap(), 2);
    }

    #[test]
    fn test_check_fails_fast() {
        let (_root, config) = manual(&[
            ("index.md", "[usage](usage.md#missing)\n"),
            ("usage.md", "# Usage\n"),
        ]);
        let context = collect_build(&config, false).unwrap();
        let err = check_context(context, &config).unwrap_err();

        assert_eq!(
            err.downcast_ref::<XrefError>(),
            Some(&XrefError::UnresolvedAnchor {
                target: DocumentId::from_path("usage").unwrap(),
                anchor: "missing".into(),
                referenced_from: DocumentId::from_path("index").unwrap(),
            })
        );
    }

    #[test]
    fn test_check_keep_going_reports_all() {
        let (_root, mut config) = manual(&[
            ("index.md", "[a](gone.md) [b](usage.md#missing)\n"),
            ("usage.md", "# Usage\n\n[c](#nope)\n"),
        ]);
        config.validate.keep_going = true;

        let context = collect_build(&config, false).unwrap();
        let err = check_context(context, &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "found 3 dangling references in 2 documents"
        );
    }
}
