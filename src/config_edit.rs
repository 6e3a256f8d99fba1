//! Format-preserving edits to `.linkspy.toml`.

use std::path::{Path, PathBuf};

use crate::config::{Settings, config_path};
use crate::error::Error;

/// Keys accepted by `config set` and `config unset`.
pub const SETTING_KEYS: [&str; 3] = ["attachment_folder", "ignore_move_to_folder", "move_to_folder"];

/// Set one key in `.linkspy.toml`, creating the file if needed.
/// The edited document is re-parsed before it is written so a bad value never lands on disk.
///
/// # Errors
///
/// Returns `Error::UnknownSetting` for unrecognised keys,
/// `Error::InvalidSettingValue` for a non-boolean `ignore_move_to_folder`,
/// `Error::ConfigParse` if the existing file can't be parsed,
/// or `Error::Io` if writing fails.
pub fn set(root: &Path, key: &str, value: &str) -> Result<Settings, Error> {
    let item = match key {
        "attachment_folder" | "move_to_folder" => toml_edit::value(value),
        "ignore_move_to_folder" => toml_edit::value(parse_bool(key, value)?),
        _ => return Err(Error::UnknownSetting { key: key.to_string() }),
    };

    let (path, mut doc) = read_config_doc(root)?;
    doc[key] = item;
    return write_checked(&path, &doc);
}

/// Remove one key from `.linkspy.toml`. Removing an absent key is not an error.
///
/// # Errors
///
/// Returns `Error::UnknownSetting` for unrecognised keys,
/// `Error::ConfigParse` if the file can't be parsed, or `Error::Io` if writing fails.
pub fn unset(root: &Path, key: &str) -> Result<Settings, Error> {
    if !SETTING_KEYS.contains(&key) {
        return Err(Error::UnknownSetting { key: key.to_string() });
    }

    let (path, mut doc) = read_config_doc(root)?;
    doc.remove(key);
    return write_checked(&path, &doc);
}

/// Accept the spellings people actually type for booleans.
///
/// # Errors
///
/// Returns `Error::InvalidSettingValue` for anything else.
fn parse_bool(key: &str, value: &str) -> Result<bool, Error> {
    return match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::InvalidSettingValue {
            expected: "true or false",
            key: key.to_string(),
            value: value.to_string(),
        }),
    };
}

/// Parse `.linkspy.toml` into a format-preserving document.
/// Returns an empty document if the file doesn't exist.
///
/// # Errors
///
/// Returns `Error::Io` on read failure or `Error::ConfigParse` on parse failure.
fn read_config_doc(root: &Path) -> Result<(PathBuf, toml_edit::DocumentMut), Error> {
    let path = config_path(root);
    let content = match std::fs::read_to_string(&path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::Io(e)),
        Ok(c) => c,
    };

    let doc: toml_edit::DocumentMut = content.parse().map_err(|e: toml_edit::TomlError| {
        return Error::ConfigParse { path: path.clone(), reason: e.to_string() };
    })?;

    return Ok((path, doc));
}

/// Validate the edited document as `Settings`, then write it.
///
/// # Errors
///
/// Returns `Error::TomlDe` if the result is not valid settings, or `Error::Io` if writing fails.
fn write_checked(path: &Path, doc: &toml_edit::DocumentMut) -> Result<Settings, Error> {
    let text = doc.to_string();
    let settings = Settings::parse(&text)?;
    std::fs::write(path, text)?;
    return Ok(settings);
}
