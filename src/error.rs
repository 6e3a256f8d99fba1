/// Crate-level error types for linkspy scans and corrective actions.
use std::path::PathBuf;

/// All errors in linkspy carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the path, target, or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-level error type re-exported as linkspy::Error")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A canvas payload is not valid JSON or does not have the expected shape.
    #[error("invalid canvas: {path}: {reason}")]
    CanvasParse {
        /// Vault path of the canvas document.
        path: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A configuration file exists but could not be parsed for editing.
    #[error("config parse failed: {}: {reason}", path.display())]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// Creating a missing document failed.
    #[error("create failed: {path}: {reason}")]
    CreateFailed {
        /// Vault path that could not be created.
        path: String,
        /// Why the repository refused the create.
        reason: String,
    },

    /// A referenced vault file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Vault path of the missing file.
        path: String,
    },

    /// A setting value could not be interpreted for its key.
    #[error("invalid value for `{key}`: `{value}` ({expected})")]
    InvalidSettingValue {
        /// What the key accepts.
        expected: &'static str,
        /// Setting key.
        key: String,
        /// Rejected value as typed by the user.
        value: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Rendering output as JSON failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serialization error.
        #[from]
        serde_json::Error,
    ),

    /// A move action was requested but no destination folder is configured.
    #[error("no move-to folder configured")]
    MoveDestinationNotConfigured,

    /// Moving an attachment failed.
    #[error("move failed: {from} -> {to}: {reason}")]
    MoveFailed {
        /// Vault path of the file being moved.
        from: String,
        /// Why the repository refused the move.
        reason: String,
        /// Requested destination path.
        to: String,
    },

    /// A document could not be read during a scan.
    #[error("read failed: {path}: {reason}")]
    ReadFailed {
        /// Vault path of the unreadable document.
        path: String,
        /// Description of the read failure.
        reason: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// An action referenced a finding that is not in the current result set.
    #[error("no current finding for `{key}`")]
    UnknownFinding {
        /// Display form of the key that was looked up.
        key: String,
    },

    /// A config key that linkspy does not recognise.
    #[error("unknown setting: `{key}`")]
    UnknownSetting {
        /// The rejected key.
        key: String,
    },

    /// The filesystem watcher could not be created or attached.
    #[error("watch failed: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
