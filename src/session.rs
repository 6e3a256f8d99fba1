//! One scan-and-correct session: owns the repository, the settings, and the
//! current result set. It is the only writer of the result set.

use tracing::debug;

use crate::actions::{Action, ActionDispatcher, ActionOutcome};
use crate::config::Settings;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::repository::FileRepository;
use crate::results::ResultSet;
use crate::scan::{self, ScanKind};

/// Scans a repository and applies corrective actions to the resulting findings.
pub struct Session<R: FileRepository> {
    /// Repository scanned and mutated by this session.
    repo: R,
    /// Findings of the most recent scan, if any.
    results: Option<ResultSet>,
    /// Settings threaded into every scan and action.
    settings: Settings,
}

impl<R: FileRepository> Session<R> {
    /// A session with no scan run yet.
    pub const fn new(repo: R, settings: Settings) -> Self {
        return Self { repo, results: None, settings };
    }

    /// Run a corrective action and apply its outcome to the result set.
    /// A failed action leaves the result set untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownFinding` if no scan has run, or the action's error.
    pub fn dispatch(&mut self, action: &Action) -> Result<ActionOutcome, Error> {
        let Some(results) = self.results.as_mut() else {
            return Err(Error::UnknownFinding { key: format!("{action:?}") });
        };

        let outcome = ActionDispatcher::new(&mut self.repo, &self.settings).execute(action, results)?;

        for key in outcome.resolved_keys() {
            let removed = results.remove_by_key(&key);
            debug!(%key, removed, "applied action outcome");
        }
        return Ok(outcome);
    }

    /// Consume the session and return its repository.
    pub fn into_repository(self) -> R {
        return self.repo;
    }

    /// The repository this session works on.
    pub const fn repository(&self) -> &R {
        return &self.repo;
    }

    /// Findings of the most recent scan.
    pub const fn results(&self) -> Option<&ResultSet> {
        return self.results.as_ref();
    }

    /// Snapshot the repository, run a scan, and replace the result set with its findings.
    ///
    /// # Errors
    ///
    /// Returns the repository's listing error. Per-file failures become issues instead.
    pub fn run_scan(&mut self, kind: ScanKind) -> Result<&ResultSet, Error> {
        let report = {
            let corpus = Corpus::snapshot(&self.repo)?;
            scan::run(kind, &corpus, &self.settings)
        };
        return Ok(self.results.insert(ResultSet::from_report(report)));
    }

    /// Settings used by this session.
    pub const fn settings(&self) -> &Settings {
        return &self.settings;
    }
}
