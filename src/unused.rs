//! Attachments that exist but are never referenced.

use tracing::debug;

use crate::config::Settings;
use crate::corpus::Corpus;
use crate::index::ReferenceIndex;
use crate::scan::{ScanKind, ScanReport};
use crate::types::{FileRecord, Finding, is_inside_folder};

/// Report every candidate attachment whose name no document or canvas references.
/// Findings follow the listing order of the filtered attachments.
pub fn run(corpus: &Corpus<'_>, settings: &Settings) -> ScanReport {
    let candidates = candidate_attachments(corpus, settings);
    let (index, issues) = ReferenceIndex::build(corpus);

    let findings = candidates
        .into_iter()
        .filter(|file| return !index.contains(&file.name))
        .map(Finding::unused_attachment)
        .collect();

    return ScanReport { findings, issues, kind: ScanKind::UnusedAttachments };
}

/// Image attachments, restricted to the attachment folder when one is configured,
/// minus those already sitting in the move-to folder when that is ignored.
fn candidate_attachments<'c>(corpus: &'c Corpus<'_>, settings: &Settings) -> Vec<&'c FileRecord> {
    let attachment_folder = settings.attachment_folder();
    let excluded_folder = settings.ignored_move_folder();
    debug!(?attachment_folder, ?excluded_folder, "filtering attachments");

    return corpus
        .attachments()
        .filter(|file| return attachment_folder.is_none_or(|folder| return is_inside_folder(&file.path, folder)))
        .filter(|file| return excluded_folder.is_none_or(|folder| return !is_inside_folder(&file.path, folder)))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    fn unused_paths(repo: &MemoryRepository, settings: &Settings) -> Vec<String> {
        let corpus = Corpus::snapshot(repo).unwrap();
        run(&corpus, settings).findings.into_iter().map(|f| f.source_path).collect()
    }

    #[test]
    fn orphan_attachment_is_reported() {
        let repo = MemoryRepository::new()
            .with_file("note.md", "no links here")
            .with_file("orphan.png", "");
        assert_eq!(unused_paths(&repo, &Settings::default()), vec!["orphan.png"]);
    }

    #[test]
    fn referenced_attachment_in_attachment_folder_is_not_reported() {
        let repo = MemoryRepository::new()
            .with_file("note.md", "![[photo.jpg]]")
            .with_file("assets/photo.jpg", "");
        let settings = Settings { attachment_folder: Some("assets".to_string()), ..Settings::default() };
        assert!(unused_paths(&repo, &settings).is_empty());
    }

    #[test]
    fn attachment_folder_restricts_candidates() {
        let repo = MemoryRepository::new()
            .with_file("assets/a.png", "")
            .with_file("assets2/b.png", "")
            .with_file("c.png", "");
        let settings = Settings { attachment_folder: Some("/assets/".to_string()), ..Settings::default() };
        assert_eq!(unused_paths(&repo, &settings), vec!["assets/a.png"]);
    }

    #[test]
    fn move_folder_is_excluded_only_when_ignored() {
        let repo = MemoryRepository::new()
            .with_file("archive/old.png", "")
            .with_file("new.png", "");
        let mut settings = Settings { move_to_folder: Some("archive".to_string()), ..Settings::default() };
        assert_eq!(unused_paths(&repo, &settings), vec!["archive/old.png", "new.png"]);

        settings.ignore_move_to_folder = true;
        assert_eq!(unused_paths(&repo, &settings), vec!["new.png"]);
    }

    #[test]
    fn canvas_references_count() {
        let repo = MemoryRepository::new()
            .with_file("board.canvas", r#"{"nodes":[{"type":"file","file":"pics/used.png"}]}"#)
            .with_file("pics/used.png", "")
            .with_file("pics/unused.png", "");
        assert_eq!(unused_paths(&repo, &Settings::default()), vec!["pics/unused.png"]);
    }

    #[test]
    fn rerunning_on_unchanged_vault_is_identical() {
        let repo = MemoryRepository::new()
            .with_file("a.md", "![[b.png]]")
            .with_file("b.png", "")
            .with_file("c.gif", "")
            .with_file("d/e.jpeg", "");
        let first = unused_paths(&repo, &Settings::default());
        let second = unused_paths(&repo, &Settings::default());
        assert_eq!(first, vec!["c.gif", "d/e.jpeg"]);
        assert_eq!(first, second);
    }
}
