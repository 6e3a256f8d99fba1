//! File watcher: runs a scan on startup, then re-runs it whenever the vault changes.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};
use tracing::{debug, info};

use crate::commands;
use crate::diagnostics;
use crate::error::Error;
use crate::report::Format;
use crate::scan::ScanKind;

/// Debounce delay between filesystem events and re-scan.
const DEBOUNCE_MS: u64 = 100;

/// Exit code for a scan that failed at runtime.
const RUNTIME_ERROR_EXIT: u8 = 3;

/// Create a filesystem watcher that sends one unit per relevant event.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(tx: crossbeam_channel::Sender<()>) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
            )
        {
            debug!(paths = ?event.paths, "vault changed");
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch { reason: format!("watcher setup failed: {e}") };
    });
}

/// Entry point for the watch command.
///
/// Runs an initial scan, then watches the whole vault and re-scans on changes.
/// Returns the exit code of the last scan once the watcher disconnects.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created or attached to `root`.
pub fn run(root: &Path, kind: ScanKind, format: Format) -> Result<ExitCode, Error> {
    eprintln!("watch: initial scan");
    let mut last_code = run_scan(root, kind, format);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher.watch(root, RecursiveMode::Recursive).map_err(|e| {
        return Error::Watch { reason: format!("cannot watch {}: {e}", root.display()) };
    })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", root.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        info!(scan = kind.title(), "change detected, re-scanning");
        eprintln!("watch: change detected, re-scanning...");
        last_code = run_scan(root, kind, format);
    }

    return Ok(last_code);
}

/// Run the scan once and print its result. A failed scan prints a diagnostic and keeps watching.
fn run_scan(root: &Path, kind: ScanKind, format: Format) -> ExitCode {
    return match commands::scan(root, kind, format) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(RUNTIME_ERROR_EXIT)
        },
    };
}
