//! Source discovery: walk the document root, load every document.

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rayon::prelude::*;

use super::{ContentKind, SourceError, load_document};
use crate::config::SourceConfig;
use crate::logger::ProgressLine;
use crate::tree::SourceDocument;

/// Collect every recognised document file under the source root.
///
/// Hidden entries and directories named in `exclude` are skipped.
/// Paths come back sorted.
pub fn collect_source_files(config: &SourceConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(&config.dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| ContentKind::from_path(path, config).is_some())
        .filter(|path| !in_excluded_dir(path, config))
        .collect();
    files.sort_unstable();
    files
}

fn in_excluded_dir(path: &Path, config: &SourceConfig) -> bool {
    let Some(dir) = path.strip_prefix(&config.dir).ok().and_then(Path::parent) else {
        return false;
    };
    dir.components()
        .any(|c| c.as_os_str().to_str().is_some_and(|name| config.is_excluded(name)))
}

/// Load every document in parallel, returned in build order (sorted by id).
pub fn load_documents(
    config: &SourceConfig,
    show_progress: bool,
) -> Result<Vec<SourceDocument>, SourceError> {
    let files = collect_source_files(config);

    let counts = ContentKind::ALL.map(|kind| {
        let count = files
            .iter()
            .filter(|path| ContentKind::from_path(path, config) == Some(kind))
            .count();
        (kind.name(), count)
    });
    let progress = show_progress.then(|| ProgressLine::new("load", &counts));

    let mut documents = files
        .par_iter()
        .map(|path| {
            let document = load_document(path, config)?;
            if let Some(progress) = &progress
                && let Some(kind) = ContentKind::from_path(path, config)
            {
                progress.inc(kind.name());
            }
            Ok(document)
        })
        .collect::<Result<Vec<_>, SourceError>>()?;

    if let Some(progress) = progress {
        progress.finish();
    }

    documents.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(documents)
}
