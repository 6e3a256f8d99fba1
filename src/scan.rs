//! Scan kinds, their reports, and dispatch to the three classifier scans.

use serde::Serialize;
use tracing::info;

use crate::backlinks;
use crate::config::Settings;
use crate::corpus::Corpus;
use crate::missing;
use crate::types::{Finding, ScanIssue};
use crate::unused;

/// The three integrity scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Wikilinks to documents that do not exist.
    BrokenBacklinks,
    /// Attachment references to files that do not exist.
    MissingAttachments,
    /// Attachments nothing references.
    UnusedAttachments,
}

impl ScanKind {
    /// Singular and plural noun used in the summary line.
    const fn nouns(self) -> (&'static str, &'static str) {
        return match self {
            ScanKind::BrokenBacklinks => ("broken backlink", "broken backlinks"),
            ScanKind::MissingAttachments => ("missing attachment", "missing attachments"),
            ScanKind::UnusedAttachments => ("unused attachment", "unused attachments"),
        };
    }

    /// `"<N> <noun> found"`, singular only when `count == 1`.
    pub fn summary(self, count: usize) -> String {
        let (singular, plural) = self.nouns();
        let noun = if count == 1 { singular } else { plural };
        return format!("{count} {noun} found");
    }

    /// Heading shown above the findings.
    pub const fn title(self) -> &'static str {
        return match self {
            ScanKind::BrokenBacklinks => "Backlinks With Missing Files",
            ScanKind::MissingAttachments => "Missing Attachments",
            ScanKind::UnusedAttachments => "Unused Attachments",
        };
    }
}

/// Output of one scan: findings in document order plus per-file problems.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Findings in corpus-listing order.
    pub findings: Vec<Finding>,
    /// Files that could not be processed. Not counted as findings.
    pub issues: Vec<ScanIssue>,
    /// Which scan produced this report.
    pub kind: ScanKind,
}

/// Run one scan over a snapshot.
pub fn run(kind: ScanKind, corpus: &Corpus<'_>, settings: &Settings) -> ScanReport {
    info!(?kind, files = corpus.files().len(), "scan started");
    let report = match kind {
        ScanKind::BrokenBacklinks => backlinks::run(corpus),
        ScanKind::MissingAttachments => missing::run(corpus),
        ScanKind::UnusedAttachments => unused::run(corpus, settings),
    };
    info!(
        ?kind,
        findings = report.findings.len(),
        issues = report.issues.len(),
        "scan finished"
    );
    return report;
}
