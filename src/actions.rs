//! Corrective actions against the file repository.
//!
//! The dispatcher performs the file operation and reports what changed as an
//! `ActionOutcome`; it never touches the result set. The owning session applies
//! the outcome, so a failed action leaves every finding in place.

use serde::Serialize;
use tracing::{info, warn};

use crate::backlinks::with_extension;
use crate::config::Settings;
use crate::error::Error;
use crate::repository::FileRepository;
use crate::results::ResultSet;
use crate::types::{DOCUMENT_EXTENSION, FindingKey, FindingKind, final_segment};

/// A corrective action requested by the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create an empty document for a broken backlink's target.
    CreateMissingFile {
        /// Unresolved wikilink target, as reported in the finding.
        target: String,
    },
    /// Move every current unused attachment to the move-to folder.
    MoveAll,
    /// Move one unused attachment to the move-to folder.
    MoveToFolder {
        /// Vault path of the attachment.
        path: String,
    },
}

/// One attachment that was moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Moved {
    /// Path before the move.
    pub from: String,
    /// Key of the finding the move resolves.
    pub key: FindingKey,
    /// Path after the move.
    pub to: String,
}

/// One attachment a bulk move could not relocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveFailure {
    /// Vault path of the attachment.
    pub path: String,
    /// Why the move failed.
    pub reason: String,
}

/// What a successful action changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// A missing document now exists and should be opened for editing.
    Created {
        /// Key of the findings the new document resolves.
        key: FindingKey,
        /// Path of the new document.
        open_path: String,
    },
    /// One attachment was moved.
    Moved(Moved),
    /// A bulk move ran to the end, possibly with failures.
    MovedAll {
        /// Attachments that stayed where they were.
        failed: Vec<MoveFailure>,
        /// Attachments that were moved.
        moved: Vec<Moved>,
    },
}

impl ActionOutcome {
    /// Keys of the findings this outcome resolves.
    pub fn resolved_keys(&self) -> Vec<FindingKey> {
        return match self {
            ActionOutcome::Created { key, .. } => vec![key.clone()],
            ActionOutcome::Moved(moved) => vec![moved.key.clone()],
            ActionOutcome::MovedAll { moved, .. } => moved.iter().map(|m| return m.key.clone()).collect(),
        };
    }
}

/// Executes actions against a repository with explicit settings.
pub struct ActionDispatcher<'a> {
    /// Repository the actions mutate.
    repo: &'a mut dyn FileRepository,
    /// Move-to folder and related settings.
    settings: &'a Settings,
}

impl<'a> ActionDispatcher<'a> {
    /// A dispatcher over `repo` using `settings`.
    pub fn new(repo: &'a mut dyn FileRepository, settings: &'a Settings) -> Self {
        return Self { repo, settings };
    }

    /// Run an action whose target must be a current finding of the right kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFinding` if the target is not a current finding,
    /// or the error of the underlying action.
    pub fn execute(&mut self, action: &Action, current: &ResultSet) -> Result<ActionOutcome, Error> {
        return match action {
            Action::CreateMissingFile { target } => {
                require_finding(current, &FindingKey::Target(target.clone()), FindingKind::BrokenBacklink)?;
                self.create_missing_file(target)
            },
            Action::MoveAll => self.move_all(current),
            Action::MoveToFolder { path } => {
                require_finding(current, &FindingKey::Attachment(path.clone()), FindingKind::UnusedAttachment)?;
                Ok(ActionOutcome::Moved(self.move_to_folder(path)?))
            },
        };
    }

    /// Create an empty document for `target`, adding `.md` if absent and
    /// creating its parent folder when the target names one.
    ///
    /// # Errors
    ///
    /// Returns `Error::CreateFailed` if the folder or file cannot be created.
    pub fn create_missing_file(&mut self, target: &str) -> Result<ActionOutcome, Error> {
        let path = with_extension(target.trim().trim_start_matches('/'), DOCUMENT_EXTENSION);
        if let Some((parent, _name)) = path.rsplit_once('/') {
            self.repo.create_folder(parent)?;
        }
        let record = self.repo.create_file(&path, "")?;
        info!(path = %record.path, "created missing document");

        return Ok(ActionOutcome::Created {
            key: FindingKey::Target(target.to_string()),
            open_path: record.path,
        });
    }

    /// Move every unused attachment in `current`, continuing past failures.
    ///
    /// # Errors
    ///
    /// Returns `Error::MoveDestinationNotConfigured` before touching any file
    /// when no move-to folder is set. Individual move failures are tallied instead.
    pub fn move_all(&mut self, current: &ResultSet) -> Result<ActionOutcome, Error> {
        self.destination()?;

        let paths: Vec<String> = current
            .all()
            .filter(|f| return f.kind == FindingKind::UnusedAttachment)
            .map(|f| return f.source_path.clone())
            .collect();

        let mut moved = Vec::new();
        let mut failed = Vec::new();
        for path in paths {
            match self.move_to_folder(&path) {
                Ok(m) => moved.push(m),
                Err(e) => {
                    warn!(%path, error = %e, "move failed, continuing");
                    failed.push(MoveFailure { path, reason: e.to_string() });
                },
            }
        }

        info!(moved = moved.len(), failed = failed.len(), "bulk move finished");
        return Ok(ActionOutcome::MovedAll { failed, moved });
    }

    /// Move one attachment into the move-to folder, creating the folder if needed.
    ///
    /// # Errors
    ///
    /// Returns `Error::MoveDestinationNotConfigured` without touching any file
    /// when no move-to folder is set, `Error::FileNotFound` if the attachment
    /// is gone, or `Error::MoveFailed` if the repository refuses the move.
    pub fn move_to_folder(&mut self, path: &str) -> Result<Moved, Error> {
        let destination = self.destination()?;
        let record = self.repo.exists(path).ok_or_else(|| return Error::FileNotFound { path: path.to_string() })?;

        let new_path = if destination.is_empty() {
            record.name.clone()
        } else {
            self.repo.create_folder(&destination)?;
            format!("{destination}/{}", final_segment(&record.path))
        };
        let moved = self.repo.move_file(&record, &new_path)?;
        info!(from = %record.path, to = %moved.path, "moved attachment");

        return Ok(Moved {
            from: record.path.clone(),
            key: FindingKey::Attachment(record.path),
            to: moved.path,
        });
    }

    /// The configured move-to folder, `""` for the vault root.
    ///
    /// # Errors
    ///
    /// Returns `Error::MoveDestinationNotConfigured` when none is set.
    fn destination(&self) -> Result<String, Error> {
        return self
            .settings
            .move_destination()
            .map(str::to_string)
            .ok_or(Error::MoveDestinationNotConfigured);
    }
}

/// Check that `current` holds a finding of `kind` under `key`.
///
/// # Errors
///
/// Returns `Error::UnknownFinding` otherwise.
fn require_finding(current: &ResultSet, key: &FindingKey, kind: FindingKind) -> Result<(), Error> {
    if current.find(key).is_some_and(|f| return f.kind == kind) {
        return Ok(());
    }
    return Err(Error::UnknownFinding { key: key.to_string() });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;
    use crate::types::{FileRecord, Finding};

    fn settings(folder: Option<&str>) -> Settings {
        Settings { move_to_folder: folder.map(str::to_string), ..Settings::default() }
    }

    fn unused(paths: &[&str]) -> ResultSet {
        let mut set = ResultSet::new(crate::scan::ScanKind::UnusedAttachments);
        for path in paths {
            set.append(Finding::unused_attachment(&FileRecord::from_path(path)));
        }
        set
    }

    #[test]
    fn move_creates_folder_and_reports_key() {
        let mut repo = MemoryRepository::new().with_file("pics/a.png", "");
        let settings = settings(Some("/archive/"));
        let current = unused(&["pics/a.png"]);

        let outcome = ActionDispatcher::new(&mut repo, &settings)
            .execute(&Action::MoveToFolder { path: "pics/a.png".to_string() }, &current)
            .unwrap();

        assert_eq!(outcome.resolved_keys(), vec![FindingKey::Attachment("pics/a.png".to_string())]);
        assert!(repo.exists("archive/a.png").is_some());
        assert!(repo.exists("pics/a.png").is_none());
        assert_eq!(repo.folders().collect::<Vec<_>>(), vec!["archive"]);
    }

    #[test]
    fn move_to_root_destination() {
        let mut repo = MemoryRepository::new().with_file("pics/a.png", "");
        let settings = settings(Some("/"));
        let moved = ActionDispatcher::new(&mut repo, &settings).move_to_folder("pics/a.png").unwrap();
        assert_eq!(moved.to, "a.png");
    }

    #[test]
    fn move_without_destination_touches_nothing() {
        let mut repo = MemoryRepository::new().with_file("a.png", "");
        let settings = settings(None);
        let current = unused(&["a.png"]);

        let err = ActionDispatcher::new(&mut repo, &settings).execute(&Action::MoveAll, &current).unwrap_err();
        assert!(matches!(err, Error::MoveDestinationNotConfigured));
        assert!(repo.exists("a.png").is_some());
        assert_eq!(repo.folders().count(), 0);
    }

    #[test]
    fn bulk_move_continues_past_failures() {
        let mut repo = MemoryRepository::new()
            .with_file("a.png", "")
            .with_file("b.png", "")
            .with_file("archive/b.png", "occupied")
            .with_file("c.png", "");
        let settings = settings(Some("archive"));
        let current = unused(&["a.png", "b.png", "c.png"]);

        let outcome = ActionDispatcher::new(&mut repo, &settings).execute(&Action::MoveAll, &current).unwrap();
        let ActionOutcome::MovedAll { moved, failed } = outcome else { panic!("expected bulk outcome") };
        assert_eq!(moved.iter().map(|m| m.from.as_str()).collect::<Vec<_>>(), vec!["a.png", "c.png"]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, "b.png");
        assert!(repo.exists("b.png").is_some());
    }

    #[test]
    fn create_appends_extension_and_parent_folder() {
        let mut repo = MemoryRepository::new().with_file("a.md", "[[ideas/b]]");
        let settings = Settings::default();
        let mut current = ResultSet::new(crate::scan::ScanKind::BrokenBacklinks);
        current.append(Finding::broken_backlink("a.md", "ideas/b"));

        let outcome = ActionDispatcher::new(&mut repo, &settings)
            .execute(&Action::CreateMissingFile { target: "ideas/b".to_string() }, &current)
            .unwrap();

        assert_eq!(
            outcome,
            ActionOutcome::Created {
                key: FindingKey::Target("ideas/b".to_string()),
                open_path: "ideas/b.md".to_string(),
            }
        );
        assert_eq!(repo.content("ideas/b.md"), Some(""));
        assert_eq!(repo.folders().collect::<Vec<_>>(), vec!["ideas"]);
    }

    #[test]
    fn actions_on_unknown_findings_are_rejected() {
        let mut repo = MemoryRepository::new().with_file("a.png", "");
        let settings = settings(Some("archive"));
        let current = unused(&[]);

        let err = ActionDispatcher::new(&mut repo, &settings)
            .execute(&Action::MoveToFolder { path: "a.png".to_string() }, &current)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFinding { .. }));
        assert!(repo.exists("a.png").is_some());
    }
}
