//! Markdown diagnostics for errors, printed to stderr.

use crate::config::CONFIG_FILE;
use crate::config_edit::SETTING_KEYS;
use crate::error::Error;

/// ANSI bold, used for headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one, how to fix it.
#[allow(clippy::wildcard_enum_match_arm, reason = "remaining variants share the generic renderer")]
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::InvalidSettingValue { expected, key, value } => render_invalid_value(key, value, expected),
        Error::MoveDestinationNotConfigured => render_move_not_configured(),
        Error::MoveFailed { from, reason, to } => render_move_failed(from, to, reason),
        Error::TomlDe(inner) => render_invalid_config(&inner.to_string()),
        Error::UnknownFinding { key } => render_unknown_finding(key),
        Error::UnknownSetting { key } => render_unknown_setting(key),
        _ => render_generic(e),
    };
}

/// Errors whose message is enough on its own.
#[allow(clippy::wildcard_enum_match_arm, reason = "falls back to the Display message")]
fn render_generic(e: &Error) -> String {
    return match e {
        Error::ConfigParse { path, reason } => format!("\
# Error: Config Unreadable

Could not parse `{}`: {reason}

## Fix

Repair the TOML by hand, or delete the file to start from defaults.
", path.display()),

        Error::CreateFailed { path, reason } => format!("\
# Error: Create Failed

Could not create `{path}`: {reason}
"),

        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{path}` does not exist in the vault.
"),

        Error::Io(inner) => format!("\
# Error: I/O

{inner}
"),

        Error::Watch { reason } => format!("\
# Error: Watch Failed

{reason}
"),

        _ => format!("\
# Error

{e}
"),
    };
}

/// `.linkspy.toml` exists but does not deserialize.
fn render_invalid_config(reason: &str) -> String {
    let keys = SETTING_KEYS.join("`, `");
    return format!("\
# Error: Invalid Config

`{CONFIG_FILE}` is not valid: {reason}

## Accepted keys

`{keys}`
");
}

/// A `config set` value of the wrong type.
fn render_invalid_value(key: &str, value: &str, expected: &str) -> String {
    return format!("\
# Error: Invalid Setting Value

`{value}` is not a valid value for `{key}`; expected {expected}.

## Fix

    linkspy config set {key} true
");
}

/// A single move the repository refused.
fn render_move_failed(from: &str, to: &str, reason: &str) -> String {
    return format!("\
# Error: Move Failed

Could not move `{from}` to `{to}`: {reason}

The file was left where it was and is still reported as unused.
");
}

/// A move action with no destination set.
fn render_move_not_configured() -> String {
    return format!("\
# Error: No Move-To Folder

Moving unused attachments needs a destination folder.

## Fix

Set one in `{CONFIG_FILE}`:

    linkspy config set move_to_folder archive

Use `/` to move files to the vault root.
");
}

/// An action aimed at something the last scan did not report.
fn render_unknown_finding(key: &str) -> String {
    return format!("\
# Error: Unknown Finding

`{key}` is not among the current findings.

## Fix

Run the matching scan to see what can be acted on:

    linkspy unused
    linkspy backlinks
");
}

/// A `config` key linkspy does not know.
fn render_unknown_setting(key: &str) -> String {
    let keys = SETTING_KEYS.join("`, `");
    return format!("\
# Error: Unknown Setting

`{key}` is not a linkspy setting.

## Accepted keys

`{keys}`
");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_without_destination_explains_the_fix() {
        let md = render_error(&Error::MoveDestinationNotConfigured);
        assert!(md.starts_with("# Error: No Move-To Folder"));
        assert!(md.contains("linkspy config set move_to_folder"));
    }

    #[test]
    fn unknown_setting_lists_accepted_keys() {
        let md = render_error(&Error::UnknownSetting { key: "colour".to_string() });
        assert!(md.contains("`colour`"));
        assert!(md.contains("`attachment_folder`, `ignore_move_to_folder`, `move_to_folder`"));
    }

    #[test]
    fn unhandled_variants_fall_back_to_display() {
        let e = Error::ReadFailed { path: "a.md".to_string(), reason: "denied".to_string() };
        assert_eq!(render_error(&e), "# Error\n\nread failed: a.md: denied\n");
    }
}
