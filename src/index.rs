//! Set of attachment names referenced anywhere in the vault.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::canvas;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::extractor;
use crate::types::{ReferenceToken, ScanIssue};

/// Every attachment token referenced by a text or canvas document.
/// Built fresh for each unused-attachment scan; membership is the only contract.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    /// Deduplicated tokens.
    tokens: HashSet<ReferenceToken>,
}

impl ReferenceIndex {
    /// Read every text and canvas document in the corpus and collect their tokens.
    /// Unreadable documents and invalid canvases contribute nothing and are
    /// reported as issues; the build itself never fails.
    pub fn build(corpus: &Corpus<'_>) -> (Self, Vec<ScanIssue>) {
        let mut index = Self::default();
        let mut issues = Vec::new();

        for doc in corpus.documents() {
            match corpus.read_text(doc) {
                Ok(text) => index.extend(extractor::extract(&text)),
                Err(e) => {
                    warn!(path = %doc.path, error = %e, "skipping unreadable document");
                    issues.push(ScanIssue { path: doc.path.clone(), reason: e.to_string() });
                },
            }
        }

        for canvas_file in corpus.canvases() {
            let parsed = corpus
                .read_text(canvas_file)
                .map_err(|e| return e.to_string())
                .and_then(|json| {
                    return canvas::read(&json).map_err(|e| {
                        let error = Error::CanvasParse { path: canvas_file.path.clone(), reason: e.to_string() };
                        return error.to_string();
                    });
                });
            match parsed {
                Ok(tokens) => index.extend(tokens),
                Err(reason) => {
                    warn!(path = %canvas_file.path, %reason, "canvas contributes no references");
                    issues.push(ScanIssue { path: canvas_file.path.clone(), reason });
                },
            }
        }

        debug!(tokens = index.len(), "reference index built");
        return (index, issues);
    }

    /// Whether `name` is referenced anywhere.
    pub fn contains(&self, name: &str) -> bool {
        return self.tokens.contains(&ReferenceToken(name.to_string()));
    }

    /// Whether no references were found.
    pub fn is_empty(&self) -> bool {
        return self.tokens.is_empty();
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        return self.tokens.len();
    }

    /// Add tokens, ignoring duplicates.
    fn extend(&mut self, tokens: impl IntoIterator<Item = ReferenceToken>) {
        self.tokens.extend(tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    #[test]
    fn collects_from_documents_and_canvases() {
        let repo = MemoryRepository::new()
            .with_file("a.md", "![[one.png]]\n![[one.png]] ![x](two.gif)")
            .with_file("board.canvas", r#"{"nodes":[{"type":"file","file":"img/three.jpg"},{"type":"text","text":"![[four.bmp]]"}]}"#)
            .with_file("ignored.txt", "![[five.png]]");
        let corpus = Corpus::snapshot(&repo).unwrap();
        let (index, issues) = ReferenceIndex::build(&corpus);

        assert!(issues.is_empty());
        assert_eq!(index.len(), 4);
        for name in ["one.png", "two.gif", "three.jpg", "four.bmp"] {
            assert!(index.contains(name), "{name} missing");
        }
        assert!(!index.contains("five.png"));
    }

    #[test]
    fn bad_canvas_and_unreadable_document_are_soft_failures() {
        let repo = MemoryRepository::new()
            .with_file("good.md", "![[kept.png]]")
            .with_unreadable("locked.md")
            .with_file("broken.canvas", "{ nope");
        let corpus = Corpus::snapshot(&repo).unwrap();
        let (index, issues) = ReferenceIndex::build(&corpus);

        assert!(index.contains("kept.png"));
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["locked.md", "broken.canvas"]);
        assert!(issues[1].reason.starts_with("invalid canvas: broken.canvas: "));
    }
}
