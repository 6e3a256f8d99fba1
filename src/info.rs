//! `linkspy info`: a reference card for the tool plus the state of the current vault.

use std::path::Path;

use serde::Serialize;

use crate::config::{CONFIG_FILE, Settings, config_path};
use crate::corpus::Corpus;
use crate::error::Error;
use crate::report::{self, Format};
use crate::repository::FsRepository;

/// What linkspy sees in the vault right now.
#[derive(Debug, Serialize)]
pub struct VaultState {
    /// Image attachments.
    pub attachments: usize,
    /// Canvas documents.
    pub canvases: usize,
    /// Whether `.linkspy.toml` exists.
    pub config_found: bool,
    /// Markdown documents.
    pub documents: usize,
    /// Settings in effect.
    pub settings: Settings,
}

/// Documentation of one exit code.
#[derive(Debug, Serialize)]
struct ExitCodeInfo {
    /// Process exit code.
    code: u8,
    /// When it is returned.
    meaning: &'static str,
}

/// Everything `info --format json` prints.
#[derive(Debug, Serialize)]
struct InfoJson {
    /// Current vault state.
    current_state: VaultState,
    /// Exit codes shared by all commands.
    exit_codes: Vec<ExitCodeInfo>,
    /// Crate version.
    version: &'static str,
}

/// Exit codes shared by all commands.
const EXIT_CODES: [(u8, &str); 3] = [
    (0, "Success / no findings"),
    (1, "Findings reported, or a bulk move left files behind"),
    (3, "Runtime error"),
];

/// Gather the vault state under `root`.
///
/// # Errors
///
/// Returns errors from settings loading or the vault listing.
pub fn gather_state(root: &Path) -> Result<VaultState, Error> {
    let settings = Settings::load(root)?;
    let repo = FsRepository::new(root);
    let corpus = Corpus::snapshot(&repo)?;

    return Ok(VaultState {
        attachments: corpus.attachments().count(),
        canvases: corpus.canvases().count(),
        config_found: config_path(root).exists(),
        documents: corpus.documents().count(),
        settings,
    });
}

/// Render the reference card for `root` in the requested format.
///
/// # Errors
///
/// Returns errors from state gathering or JSON serialization.
pub fn render(root: &Path, format: Format) -> Result<String, Error> {
    let state = gather_state(root)?;
    return match format {
        Format::Json => report::json(&InfoJson {
            current_state: state,
            exit_codes: EXIT_CODES
                .iter()
                .map(|&(code, meaning)| return ExitCodeInfo { code, meaning })
                .collect(),
            version: env!("CARGO_PKG_VERSION"),
        }),
        Format::Text => Ok(render_markdown(&state)),
    };
}

/// Markdown reference card.
fn render_markdown(state: &VaultState) -> String {
    let version = env!("CARGO_PKG_VERSION");
    let mut out = format!(
        "\
# linkspy {version}

Link integrity for markdown vaults: attachments nobody links to, links to
attachments that are gone, and wikilinks to documents that do not exist.

## Recognised links

    ![[image.png]]              embed
    [[note]]  [[note|alias]]    wikilink (anchors and aliases are ignored)
    ![alt](path/to/image.png)   inline image

Canvas files contribute their file nodes and the links inside text nodes.

## Workflow

    linkspy missing                   Attachment links that resolve to nothing
    linkspy unused                    Attachments nothing links to
    linkspy backlinks                 Wikilinks to missing documents
    linkspy move <path> | --all       Move unused attachments to move_to_folder
    linkspy create <target>           Create the document a broken link wants
    linkspy watch <scan>              Re-run a scan whenever the vault changes
    linkspy config show|set|unset     Edit {CONFIG_FILE}

## Exit Codes

| Code | Meaning |
|------|---------|
"
    );
    for (code, meaning) in EXIT_CODES {
        out.push_str(&format!("| {code}    | {meaning} |\n"));
    }

    let config = if state.config_found { "found" } else { "not found" };
    let folder = |value: Option<&str>| return value.map_or_else(|| return "(unset)".to_string(), str::to_string);
    out.push_str(&format!(
        "\
## Current State

Config:            {CONFIG_FILE} ({config})
Documents:         {}
Canvases:          {}
Attachments:       {}
Attachment folder: {}
Move-to folder:    {}
Ignore move-to:    {}
",
        state.documents,
        state.canvases,
        state.attachments,
        folder(state.settings.attachment_folder.as_deref()),
        folder(state.settings.move_to_folder.as_deref()),
        state.settings.ignore_move_to_folder,
    ));
    return out;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_files_by_role() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "![[x.png]]").unwrap();
        std::fs::write(dir.path().join("board.canvas"), "{}").unwrap();
        std::fs::write(dir.path().join("x.png"), "").unwrap();

        let state = gather_state(dir.path()).unwrap();
        assert_eq!((state.documents, state.canvases, state.attachments), (1, 1, 1));
        assert!(!state.config_found);
    }

    #[test]
    fn markdown_shows_settings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(config_path(dir.path()), "move_to_folder = \"archive\"\n").unwrap();

        let text = render(dir.path(), Format::Text).unwrap();
        assert!(text.contains("Config:            .linkspy.toml (found)"));
        assert!(text.contains("Move-to folder:    archive"));
        assert!(text.contains("Attachment folder: (unset)"));
    }
}
