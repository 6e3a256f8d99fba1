//! Attachment references that resolve to no file in the vault.

use tracing::warn;

use crate::corpus::{Corpus, FileLookup};
use crate::extractor;
use crate::scan::{ScanKind, ScanReport};
use crate::types::{Finding, ScanIssue, final_extension, is_image_extension};

/// Check every line of every document for attachment tokens that do not resolve.
/// One finding per occurrence, in document order then line order.
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
        findings.extend(find_missing_in_document(&doc.path, &text, &lookup));
    }

    return ScanReport { findings, issues, kind: ScanKind::MissingAttachments };
}

/// Findings for one document's text.
fn find_missing_in_document(path: &str, text: &str, lookup: &FileLookup) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_number = u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1);
        for token in extractor::extract(line) {
            // Inline images come back with any extension.
            if !final_extension(token.as_str()).is_some_and(is_image_extension) {
                continue;
            }
            if !lookup.resolves_attachment(&token) {
                findings.push(Finding::missing_attachment(path, line_number, &token));
            }
        }
    }
    return findings;
}
