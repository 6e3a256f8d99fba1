/// Core domain types: vault file records, reference tokens, findings.
use std::fmt;

use serde::Serialize;

/// Extension of text documents scanned for links.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Extension of canvas documents (JSON node lists).
pub const CANVAS_EXTENSION: &str = "canvas";

/// Extensions treated as image attachments, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "bmp"];

/// Extensions that mark a wikilink target as an attachment rather than a document.
pub const NON_DOCUMENT_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "bmp", "mp3", "wav", "pdf"];

/// One file in the vault, as listed by a repository.
/// `name` is the last path segment; `basename` is `name` without its final extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// `name` without its final extension.
    pub basename: String,
    /// Final extension without the dot; empty when there is none.
    pub extension: String,
    /// Last path segment.
    pub name: String,
    /// Vault-relative, `/`-separated path. Unique within a snapshot.
    pub path: String,
}

impl FileRecord {
    /// Build a record from a vault-relative path, deriving name, basename, and extension.
    pub fn from_path(path: &str) -> Self {
        let name = final_segment(path).to_string();
        let (basename, extension) = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
            _ => (name.clone(), String::new()),
        };
        return Self {
            basename,
            extension,
            name,
            path: path.to_string(),
        };
    }

    /// Whether this file is a text document scanned for links.
    pub fn is_document(&self) -> bool {
        return self.extension == DOCUMENT_EXTENSION;
    }

    /// Whether this file is a canvas document.
    pub fn is_canvas(&self) -> bool {
        return self.extension == CANVAS_EXTENSION;
    }

    /// Whether this file is an image attachment.
    pub fn is_attachment(&self) -> bool {
        return is_image_extension(&self.extension);
    }
}

/// A normalized attachment filename extracted from one link occurrence.
/// Matches `FileRecord::name` by exact string; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReferenceToken(
    /// The final path segment of the link target.
    pub String,
);

impl ReferenceToken {
    /// The token text.
    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for ReferenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.write_str(&self.0);
    }
}

/// Which integrity problem a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A document links to a wikilink target that is not in the vault.
    BrokenBacklink,
    /// A document embeds an attachment that is not in the vault.
    MissingAttachment,
    /// An attachment exists but nothing references it.
    UnusedAttachment,
}

/// Key used to remove findings from a result set and to route actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FindingKey {
    /// Path of an orphan attachment.
    Attachment(String),
    /// Path of the document owning a reference.
    Document(String),
    /// Unresolved wikilink or attachment target.
    Target(String),
}

impl fmt::Display for FindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            FindingKey::Attachment(path) | FindingKey::Document(path) => f.write_str(path),
            FindingKey::Target(target) => write!(f, "[[{target}]]"),
        };
    }
}

/// One reported integrity issue. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Human-readable one-line description.
    pub display_text: String,
    /// What kind of problem this is.
    pub kind: FindingKind,
    /// One-based line of the reference; only missing attachments carry one.
    pub line_number: Option<u32>,
    /// Owning document, or the orphan attachment's own path for unused attachments.
    pub source_path: String,
    /// The unresolved reference, or the orphan attachment's name.
    pub target_name: String,
}

impl Finding {
    /// A document-to-document link whose target does not exist.
    pub fn broken_backlink(source_path: &str, target: &str) -> Self {
        return Self {
            display_text: format!("{source_path} → [[{target}]]"),
            kind: FindingKind::BrokenBacklink,
            line_number: None,
            source_path: source_path.to_string(),
            target_name: target.to_string(),
        };
    }

    /// An attachment reference on `line` of `source_path` that resolves to nothing.
    pub fn missing_attachment(source_path: &str, line: u32, token: &ReferenceToken) -> Self {
        return Self {
            display_text: format!("{source_path} line {line}: {token}"),
            kind: FindingKind::MissingAttachment,
            line_number: Some(line),
            source_path: source_path.to_string(),
            target_name: token.0.clone(),
        };
    }

    /// An attachment file that no document or canvas references.
    pub fn unused_attachment(file: &FileRecord) -> Self {
        return Self {
            display_text: format!("{}: unused attachment", file.path),
            kind: FindingKind::UnusedAttachment,
            line_number: None,
            source_path: file.path.clone(),
            target_name: file.name.clone(),
        };
    }

    /// The key a corrective action for this finding is routed by.
    pub fn action_key(&self) -> FindingKey {
        return match self.kind {
            FindingKind::BrokenBacklink => FindingKey::Target(self.target_name.clone()),
            FindingKind::MissingAttachment => FindingKey::Document(self.source_path.clone()),
            FindingKind::UnusedAttachment => FindingKey::Attachment(self.source_path.clone()),
        };
    }

    /// Every key under which this finding can be removed.
    pub fn keys(&self) -> Vec<FindingKey> {
        return match self.kind {
            FindingKind::BrokenBacklink | FindingKind::MissingAttachment => vec![
                FindingKey::Document(self.source_path.clone()),
                FindingKey::Target(self.target_name.clone()),
            ],
            FindingKind::UnusedAttachment => vec![FindingKey::Attachment(self.source_path.clone())],
        };
    }
}

/// A non-fatal problem hit while scanning one file. Never counted as a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanIssue {
    /// Vault path of the file that could not be processed.
    pub path: String,
    /// Description of what went wrong.
    pub reason: String,
}

/// Last `/`-separated segment of a path.
pub fn final_segment(path: &str) -> &str {
    return path.rsplit('/').next().unwrap_or(path);
}

/// Final extension of a name or path, without the dot.
pub fn final_extension(name: &str) -> Option<&str> {
    let (_stem, ext) = final_segment(name).rsplit_once('.')?;
    return Some(ext);
}

/// Whether `ext` is one of the image attachment extensions, ignoring case.
pub fn is_image_extension(ext: &str) -> bool {
    return IMAGE_EXTENSIONS.iter().any(|known| return known.eq_ignore_ascii_case(ext));
}

/// Whether a wikilink target names an attachment rather than a document.
pub fn is_non_document_target(target: &str) -> bool {
    return final_extension(target)
        .is_some_and(|ext| return NON_DOCUMENT_EXTENSIONS.iter().any(|known| return known.eq_ignore_ascii_case(ext)));
}

/// Trim leading and trailing slashes from a configured folder path.
pub fn trim_folder(folder: &str) -> &str {
    return folder.trim().trim_matches('/');
}

/// Whether `path` lies inside `folder` (already trimmed), on a segment boundary.
pub fn is_inside_folder(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return true;
    }
    let path = path.trim_matches('/');
    return path
        .strip_prefix(folder)
        .is_some_and(|rest| return rest.starts_with('/'));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_derives_name_and_basename() {
        let record = FileRecord::from_path("assets/img/photo.final.PNG");
        assert_eq!(record.name, "photo.final.PNG");
        assert_eq!(record.basename, "photo.final");
        assert_eq!(record.extension, "PNG");
        assert!(record.is_attachment());
    }

    #[test]
    fn dotfile_has_no_extension() {
        let record = FileRecord::from_path(".gitignore");
        assert_eq!(record.basename, ".gitignore");
        assert_eq!(record.extension, "");
    }

    #[test]
    fn non_document_targets() {
        assert!(is_non_document_target("song.MP3"));
        assert!(is_non_document_target("docs/manual.pdf"));
        assert!(!is_non_document_target("notes/v1.2"));
        assert!(!is_non_document_target("plain"));
    }

    #[test]
    fn folder_containment_respects_segments() {
        assert!(is_inside_folder("assets/photo.jpg", "assets"));
        assert!(is_inside_folder("/assets/deep/photo.jpg", "assets"));
        assert!(!is_inside_folder("assets2/photo.jpg", "assets"));
        assert!(!is_inside_folder("photo.jpg", "assets"));
    }

    #[test]
    fn unused_attachment_is_keyed_by_path() {
        let finding = Finding::unused_attachment(&FileRecord::from_path("a/orphan.png"));
        assert_eq!(finding.action_key(), FindingKey::Attachment("a/orphan.png".to_string()));
        assert_eq!(finding.target_name, "orphan.png");
    }
}
