//! Dangling reference report, grouped by referencing document.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;

use crate::core::{DocumentId, XrefError};
use crate::utils::plural::plural_s;

/// One reference that points nowhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// `doc` or `doc#anchor`.
    pub target: String,
    /// What is missing.
    pub reason: &'static str,
}

/// Every dangling reference of a build
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Grouped by referencing document label (source path or id).
    pub documents: BTreeMap<String, Vec<DanglingReference>>,
}

impl ValidationReport {
    /// Build a report from late-pass errors.
    ///
    /// `label` names the referencing document in the output; errors that are
    /// not dangling references are ignored.
    pub fn from_errors<'a>(
        errors: impl IntoIterator<Item = &'a XrefError>,
        label: impl Fn(&DocumentId) -> String,
    ) -> Self {
        let mut report = Self::default();
        for error in errors {
            let (source, target, reason) = match error {
                XrefError::UnresolvedDocument {
                    target,
                    referenced_from,
                } => (referenced_from, target.to_string(), "document not found"),
                XrefError::UnresolvedAnchor {
                    target,
                    anchor,
                    referenced_from,
                } => (
                    referenced_from,
                    format!("{target}#{anchor}"),
                    "section not found",
                ),
                _ => continue,
            };
            report.add(label(source), target, reason);
        }
        report
    }

    pub fn add(&mut self, source: String, target: String, reason: &'static str) {
        self.documents
            .entry(source)
            .or_default()
            .push(DanglingReference { target, reason });
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Count of documents with dangling references.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total dangling reference count.
    pub fn error_count(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    /// Print the full report to stderr.
    pub fn print(&self) {
        if self.is_empty() {
            return;
        }
        eprintln!();

        let document_count = self.document_count();
        let error_count = self.error_count();
        eprintln!(
            "{} {}",
            "references".red().bold(),
            format!(
                "({document_count} document{}, {error_count} error{})",
                plural_s(document_count),
                plural_s(error_count)
            )
            .dimmed()
        );

        for (source, errors) in &self.documents {
            eprintln!("{}{}{}", "[".dimmed(), source.cyan(), "]".dimmed());
            for e in errors {
                eprintln!("{} {} {}", "→".red(), e.target, e.reason.dimmed());
            }
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.error_count();
        if total == 0 {
            write!(f, "{}", "all references resolve".green())
        } else {
            write!(
                f,
                "{} {} {}",
                "found".dimmed(),
                total.to_string().red().bold(),
                format!("dangling reference{}", plural_s(total)).dimmed()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocumentId {
        DocumentId::from_path(s).unwrap()
    }

    #[test]
    fn test_from_errors_groups_by_source() {
        let errors = [
            XrefError::UnresolvedAnchor {
                target: id("b"),
                anchor: "x".into(),
                referenced_from: id("a"),
            },
            XrefError::UnresolvedDocument {
                target: id("gone"),
                referenced_from: id("c"),
            },
            XrefError::UnresolvedDocument {
                target: id("missing"),
                referenced_from: id("a"),
            },
            XrefError::DuplicateRegistration { document: id("a") },
        ];

        let report = ValidationReport::from_errors(&errors, |doc| format!("docs/{doc}.md"));
        assert_eq!(report.document_count(), 2);
        assert_eq!(report.error_count(), 3);
        assert_eq!(
            report.documents["docs/a.md"],
            [
                DanglingReference {
                    target: "b#x".into(),
                    reason: "section not found"
                },
                DanglingReference {
                    target: "missing".into(),
                    reason: "document not found"
                },
            ]
        );
    }

    #[test]
    fn test_empty_report() {
        let errors: [XrefError; 0] = [];
        let report = ValidationReport::from_errors(&errors, |doc| doc.to_string());
        assert!(report.is_empty());
        assert!(format!("{report}").contains("all references resolve"));
    }
}
