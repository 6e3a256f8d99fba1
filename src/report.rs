//! Text and JSON rendering of result sets and action outcomes.

use std::fmt::Write as _;

use serde::Serialize;

use crate::actions::{ActionOutcome, Moved};
use crate::error::Error;
use crate::results::ResultSnapshot;

/// Output format shared by every command that prints results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON on stdout.
    Json,
    /// Human-readable lines on stdout.
    #[default]
    Text,
}

/// Render any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn json<T: Serialize>(value: &T) -> Result<String, Error> {
    return Ok(serde_json::to_string_pretty(value)?);
}

/// Render an action outcome in the requested format.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn outcome(outcome: &ActionOutcome, format: Format) -> Result<String, Error> {
    return match format {
        Format::Json => json(outcome),
        Format::Text => Ok(outcome_text(outcome)),
    };
}

/// One line per changed file, then a tally for bulk moves.
pub fn outcome_text(outcome: &ActionOutcome) -> String {
    let mut out = String::new();
    match outcome {
        ActionOutcome::Created { open_path, .. } => {
            let _ = writeln!(out, "created {open_path}");
        },
        ActionOutcome::Moved(moved) => write_moved(&mut out, moved),
        ActionOutcome::MovedAll { failed, moved } => {
            for m in moved {
                write_moved(&mut out, m);
            }
            for failure in failed {
                let _ = writeln!(out, "failed  {}: {}", failure.path, failure.reason);
            }
            let _ = writeln!(out, "\n{} moved, {} failed", moved.len(), failed.len());
        },
    }
    return out;
}

/// Render a result snapshot in the requested format.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
pub fn results(snapshot: &ResultSnapshot, format: Format) -> Result<String, Error> {
    return match format {
        Format::Json => json(snapshot),
        Format::Text => Ok(results_text(snapshot)),
    };
}

/// Title, one line per finding, any unreadable files, then the summary line.
pub fn results_text(snapshot: &ResultSnapshot) -> String {
    let mut out = format!("# {}\n\n", snapshot.title);

    for finding in &snapshot.findings {
        let _ = writeln!(out, "{}", finding.display_text);
    }
    if !snapshot.findings.is_empty() {
        out.push('\n');
    }

    if !snapshot.issues.is_empty() {
        out.push_str("Skipped:\n");
        for issue in &snapshot.issues {
            let _ = writeln!(out, "  {}: {}", issue.path, issue.reason);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", snapshot.summary);
    return out;
}

/// `moved <from> -> <to>`.
fn write_moved(out: &mut String, moved: &Moved) {
    let _ = writeln!(out, "moved   {} -> {}", moved.from, moved.to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::MoveFailure;
    use crate::results::ResultSet;
    use crate::scan::ScanKind;
    use crate::types::{FileRecord, Finding, FindingKey, ScanIssue};

    #[test]
    fn text_lists_findings_then_summary() {
        let mut set = ResultSet::new(ScanKind::UnusedAttachments);
        set.append(Finding::unused_attachment(&FileRecord::from_path("pics/a.png")));

        let text = results_text(&set.snapshot());
        assert_eq!(text, "# Unused Attachments\n\npics/a.png: unused attachment\n\n1 unused attachment found\n");
    }

    #[test]
    fn text_reports_skipped_files_separately() {
        let mut snapshot = ResultSet::new(ScanKind::MissingAttachments).snapshot();
        snapshot.issues.push(ScanIssue { path: "board.canvas".to_string(), reason: "bad json".to_string() });

        let text = results_text(&snapshot);
        assert!(text.contains("Skipped:\n  board.canvas: bad json\n"));
        assert!(text.ends_with("0 missing attachments found\n"));
    }

    #[test]
    fn json_carries_kind_and_count() {
        let mut set = ResultSet::new(ScanKind::BrokenBacklinks);
        set.append(Finding::broken_backlink("a.md", "b"));

        let parsed: serde_json::Value = serde_json::from_str(&results(&set.snapshot(), Format::Json).unwrap()).unwrap();
        assert_eq!(parsed["kind"], "broken_backlinks");
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["findings"][0]["target_name"], "b");
    }

    #[test]
    fn bulk_outcome_tallies_failures() {
        let outcome = ActionOutcome::MovedAll {
            failed: vec![MoveFailure { path: "b.png".to_string(), reason: "occupied".to_string() }],
            moved: vec![Moved {
                from: "a.png".to_string(),
                key: FindingKey::Attachment("a.png".to_string()),
                to: "archive/a.png".to_string(),
            }],
        };

        let text = outcome_text(&outcome);
        assert!(text.starts_with("moved   a.png -> archive/a.png\nfailed  b.png: occupied\n"));
        assert!(text.ends_with("1 moved, 1 failed\n"));
    }
}
