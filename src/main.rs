use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkspy::report::Format;
use linkspy::{ScanKind, commands, diagnostics, error, info, watch};

/// Environment variable holding a tracing filter directive, e.g. `linkspy=debug`.
const LOG_ENV: &str = "LINKSPY_LOG";

/// Exit code for runtime errors, distinct from "findings reported".
const RUNTIME_ERROR_EXIT: u8 = 3;

#[derive(Parser)]
#[command(name = "linkspy", version, about = "Audit link integrity in a markdown vault")]
struct Cli {
    /// Sub-command to run.
    #[command(subcommand)]
    command: Commands,
    /// Vault root directory.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,
    /// Log debug detail to stderr (overridden by LINKSPY_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List wikilinks whose target document does not exist
    Backlinks {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Read or edit .linkspy.toml
    Config {
        /// Config operation.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Create the document a broken backlink points at
    Create {
        /// Wikilink target as reported by `backlinks`, e.g. `ideas/plan`.
        target: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Show link syntax, exit codes, and the state of the vault
    Info {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// List attachment links that resolve to no file
    Missing {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Move unused attachments to the configured move-to folder
    Move {
        /// Move every unused attachment.
        #[arg(long, conflicts_with = "path")]
        all: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
        /// Vault path of one unused attachment.
        #[arg(required_unless_present = "all")]
        path: Option<String>,
    },
    /// List attachments that nothing links to
    Unused {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Re-run a scan whenever files in the vault change
    Watch {
        /// Scan to re-run.
        #[arg(value_enum)]
        scan: WatchScan,
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a setting
    Set {
        /// Setting key.
        key: String,
        /// New value.
        value: String,
    },
    /// Print the settings in effect
    Show {
        /// Output format.
        #[arg(long, value_enum, default_value_t)]
        format: Format,
    },
    /// Remove a setting, restoring its default
    Unset {
        /// Setting key.
        key: String,
    },
}

/// Scans that `watch` can re-run.
#[derive(Clone, Copy, clap::ValueEnum)]
enum WatchScan {
    /// Broken backlinks.
    Backlinks,
    /// Missing attachments.
    Missing,
    /// Unused attachments.
    Unused,
}

impl From<WatchScan> for ScanKind {
    fn from(scan: WatchScan) -> Self {
        return match scan {
            WatchScan::Backlinks => ScanKind::BrokenBacklinks,
            WatchScan::Missing => ScanKind::MissingAttachments,
            WatchScan::Unused => ScanKind::UnusedAttachments,
        };
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.as_path();
    let result = match cli.command {
        Commands::Backlinks { format } => commands::scan(root, ScanKind::BrokenBacklinks, format),
        Commands::Config { action } => run_config(root, action),
        Commands::Create { target, format } => commands::create(root, &target, format),
        Commands::Info { format } => info::render(root, format).map(|text| {
            print!("{text}");
            return ExitCode::SUCCESS;
        }),
        Commands::Missing { format } => commands::scan(root, ScanKind::MissingAttachments, format),
        Commands::Move { all: true, format, .. } => commands::move_all(root, format),
        Commands::Move { format, path, .. } => match path {
            Some(path) => commands::move_one(root, &path, format),
            None => commands::move_all(root, format),
        },
        Commands::Unused { format } => commands::scan(root, ScanKind::UnusedAttachments, format),
        Commands::Watch { format, scan } => watch::run(root, scan.into(), format),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(RUNTIME_ERROR_EXIT)
        },
    };
}

/// Install a stderr subscriber filtered by `LINKSPY_LOG`, defaulting to
/// `warn` (or `debug` with `--verbose`).
fn init_tracing(verbose: bool) {
    let default = if verbose { "linkspy=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Dispatch a `config` sub-command.
///
/// # Errors
///
/// Returns errors from settings loading or editing.
fn run_config(root: &std::path::Path, action: ConfigAction) -> Result<ExitCode, error::Error> {
    match action {
        ConfigAction::Set { key, value } => commands::config_set(root, &key, &value)?,
        ConfigAction::Show { format } => commands::config_show(root, format)?,
        ConfigAction::Unset { key } => commands::config_unset(root, &key)?,
    }
    return Ok(ExitCode::SUCCESS);
}
