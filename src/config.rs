use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::trim_folder;

/// File name of the vault-level settings file.
pub const CONFIG_FILE: &str = ".linkspy.toml";

/// Settings for scans and actions, loaded from `.linkspy.toml`.
/// Passed explicitly into every scan and action; nothing reads them from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Default attachment folder. When set, the unused scan only looks inside it.
    pub attachment_folder: Option<String>,
    /// Skip attachments already in `move_to_folder` when looking for unused ones.
    pub ignore_move_to_folder: bool,
    /// Where move actions put unused attachments. `/` is the vault root.
    pub move_to_folder: Option<String>,
}

impl Settings {
    /// Load settings from `.linkspy.toml` in the given vault root.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed: never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = config_path(root);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        return Ok(toml::from_str(content)?);
    }

    /// The active attachment folder, trimmed of slashes. `None` when unset, empty, or the root.
    pub fn attachment_folder(&self) -> Option<&str> {
        return self
            .attachment_folder
            .as_deref()
            .map(trim_folder)
            .filter(|folder| return !folder.is_empty());
    }

    /// The folder the unused scan must skip: the move-to folder, when it is
    /// configured, not the vault root, and `ignore_move_to_folder` is on.
    pub fn ignored_move_folder(&self) -> Option<&str> {
        if !self.ignore_move_to_folder {
            return None;
        }
        return self.move_destination().filter(|folder| return !folder.is_empty());
    }

    /// The move-to folder trimmed of slashes; `Some("")` means the vault root.
    /// `None` when no destination is configured.
    pub fn move_destination(&self) -> Option<&str> {
        let raw = self.move_to_folder.as_deref()?;
        if raw.trim().is_empty() {
            return None;
        }
        return Some(trim_folder(raw));
    }
}

/// Path of the settings file for a vault root.
pub fn config_path(root: &Path) -> PathBuf {
    return root.join(CONFIG_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "move_to_folder = [").unwrap();
        assert!(matches!(Settings::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("attachment_folders = \"x\"").is_err());
    }

    #[test]
    fn folders_are_trimmed() {
        let settings = Settings::parse(
            "attachment_folder = \"/assets/\"\nmove_to_folder = \"archive/\"\nignore_move_to_folder = true\n",
        )
        .unwrap();
        assert_eq!(settings.attachment_folder(), Some("assets"));
        assert_eq!(settings.move_destination(), Some("archive"));
        assert_eq!(settings.ignored_move_folder(), Some("archive"));
    }

    #[test]
    fn root_destination_is_valid_but_never_excluded() {
        let settings = Settings {
            ignore_move_to_folder: true,
            move_to_folder: Some("/".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.move_destination(), Some(""));
        assert_eq!(settings.ignored_move_folder(), None);
    }

    #[test]
    fn blank_destination_is_unset() {
        let settings = Settings { move_to_folder: Some("  ".to_string()), ..Settings::default() };
        assert_eq!(settings.move_destination(), None);
    }
}
