//! Wikilinks whose target document does not exist.

use tracing::warn;

use crate::corpus::{Corpus, FileLookup};
use crate::extractor;
use crate::scan::{ScanKind, ScanReport};
use crate::types::{CANVAS_EXTENSION, DOCUMENT_EXTENSION, Finding, ScanIssue, is_non_document_target};

/// Check every wikilink target in every document. Attachment-typed targets are skipped.
/// Resolution is document-scoped, so findings carry no line number.
pub fn run(corpus: &Corpus<'_>) -> ScanReport {
    let lookup = corpus.lookup();
    let mut findings = Vec::new();
    let mut issues = Vec::new();

    for doc in corpus.documents() {
        let text = match corpus.read_text(doc) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %doc.path, error = %e, "skipping unreadable document");
                issues.push(ScanIssue { path: doc.path.clone(), reason: e.to_string() });
                continue;
            },
        };

        for target in extractor::extract_backlinks(&text) {
            if is_non_document_target(&target) || resolves_document(&lookup, &target) {
                continue;
            }
            findings.push(Finding::broken_backlink(&doc.path, &target));
        }
    }

    return ScanReport { findings, issues, kind: ScanKind::BrokenBacklinks };
}

/// A target resolves when `target.md` or `target.canvas` is a vault path,
/// or when any file's basename equals the target.
///
/// Basename matching spans the whole vault: `[[plan]]` is satisfied by a
/// `plan.md` in any folder, even when two folders each hold one.
pub fn resolves_document(lookup: &FileLookup, target: &str) -> bool {
    let target = target.trim_start_matches('/');
    return lookup.has_path(&with_extension(target, DOCUMENT_EXTENSION))
        || lookup.has_path(&with_extension(target, CANVAS_EXTENSION))
        || lookup.has_basename(target);
}

/// Append `.ext` unless the target already ends with it.
pub fn with_extension(target: &str, ext: &str) -> String {
    let suffix = format!(".{ext}");
    if target.ends_with(&suffix) {
        return target.to_string();
    }
    return format!("{target}{suffix}");
}
