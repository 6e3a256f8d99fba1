//! CLI commands: the three scans, the corrective actions, and config editing.
//!
//! Every command builds a fresh session over the vault at `root`, so actions
//! always run against the findings of a scan taken moments before.

use std::path::Path;
use std::process::ExitCode;

use crate::actions::{Action, ActionOutcome};
use crate::config::{CONFIG_FILE, Settings};
use crate::config_edit;
use crate::error::Error;
use crate::report::{self, Format};
use crate::repository::FsRepository;
use crate::scan::ScanKind;
use crate::session::Session;

/// Exit code when findings remain or a bulk move left files behind.
const FINDINGS_EXIT: u8 = 1;

/// Print the current settings.
///
/// # Errors
///
/// Returns errors from settings loading or JSON serialization.
pub fn config_show(root: &Path, format: Format) -> Result<(), Error> {
    let settings = Settings::load(root)?;
    match format {
        Format::Json => println!("{}", report::json(&settings)?),
        Format::Text => print!("{}", settings_text(&settings)),
    }
    return Ok(());
}

/// Set one key in `.linkspy.toml`.
///
/// # Errors
///
/// Returns errors from key validation, parsing, or writing the config file.
pub fn config_set(root: &Path, key: &str, value: &str) -> Result<(), Error> {
    config_edit::set(root, key, value)?;
    eprintln!("Set {key} = {value} in {CONFIG_FILE}");
    return Ok(());
}

/// Remove one key from `.linkspy.toml`.
///
/// # Errors
///
/// Returns errors from key validation, parsing, or writing the config file.
pub fn config_unset(root: &Path, key: &str) -> Result<(), Error> {
    config_edit::unset(root, key)?;
    eprintln!("Removed {key} from {CONFIG_FILE}");
    return Ok(());
}

/// Create the document a broken backlink points at, then print the path to open.
///
/// # Errors
///
/// Returns `Error::UnknownFinding` if no current broken backlink targets
/// `target`, or the repository's create error.
pub fn create(root: &Path, target: &str, format: Format) -> Result<ExitCode, Error> {
    let mut session = open_session(root)?;
    session.run_scan(ScanKind::BrokenBacklinks)?;
    let outcome = session.dispatch(&Action::CreateMissingFile { target: target.to_string() })?;
    return finish_action(&session, &outcome, format);
}

/// Move one unused attachment to the move-to folder.
///
/// # Errors
///
/// Returns `Error::MoveDestinationNotConfigured`, `Error::UnknownFinding` if
/// `path` is not currently unused, or the repository's move error.
pub fn move_one(root: &Path, path: &str, format: Format) -> Result<ExitCode, Error> {
    let mut session = open_session(root)?;
    session.run_scan(ScanKind::UnusedAttachments)?;
    let outcome = session.dispatch(&Action::MoveToFolder { path: path.trim_start_matches('/').to_string() })?;
    return finish_action(&session, &outcome, format);
}

/// Move every unused attachment to the move-to folder, continuing past failures.
///
/// # Errors
///
/// Returns `Error::MoveDestinationNotConfigured` before moving anything when no
/// destination is set, or errors from the scan.
pub fn move_all(root: &Path, format: Format) -> Result<ExitCode, Error> {
    let mut session = open_session(root)?;
    session.run_scan(ScanKind::UnusedAttachments)?;
    let outcome = session.dispatch(&Action::MoveAll)?;
    return finish_action(&session, &outcome, format);
}

/// Run one scan and print its findings.
/// Exit code is 0 when the vault is clean, 1 when anything was found.
///
/// # Errors
///
/// Returns errors from settings loading, the vault listing, or JSON serialization.
pub fn scan(root: &Path, kind: ScanKind, format: Format) -> Result<ExitCode, Error> {
    let mut session = open_session(root)?;
    let results = session.run_scan(kind)?;
    print!("{}", with_newline(report::results(&results.snapshot(), format)?));

    if results.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(FINDINGS_EXIT));
}

/// Print an action's outcome and the remaining finding count.
///
/// # Errors
///
/// Returns `Error::Json` if JSON serialization fails.
fn finish_action(session: &Session<FsRepository>, outcome: &ActionOutcome, format: Format) -> Result<ExitCode, Error> {
    print!("{}", with_newline(report::outcome(outcome, format)?));
    if let Some(results) = session.results() {
        eprintln!("{}", results.summary());
    }

    if let ActionOutcome::MovedAll { failed, .. } = outcome
        && !failed.is_empty()
    {
        return Ok(ExitCode::from(FINDINGS_EXIT));
    }
    return Ok(ExitCode::SUCCESS);
}

/// A session over the vault at `root` with its settings loaded.
///
/// # Errors
///
/// Returns errors from settings loading.
fn open_session(root: &Path) -> Result<Session<FsRepository>, Error> {
    let settings = Settings::load(root)?;
    return Ok(Session::new(FsRepository::new(root), settings));
}

/// `key = value` per setting, `(unset)` for absent folders.
fn settings_text(settings: &Settings) -> String {
    let folder = |value: Option<&String>| {
        return value.map_or_else(|| return "(unset)".to_string(), |v| return format!("\"{v}\""));
    };
    return format!(
        "attachment_folder = {}\nignore_move_to_folder = {}\nmove_to_folder = {}\n",
        folder(settings.attachment_folder.as_ref()),
        settings.ignore_move_to_folder,
        folder(settings.move_to_folder.as_ref()),
    );
}

/// Ensure rendered output ends with exactly one trailing newline.
fn with_newline(mut rendered: String) -> String {
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    return rendered;
}
