//! Point-in-time listing of a vault plus read access to file content.

use std::collections::HashSet;

use crate::error::Error;
use crate::repository::FileRepository;
use crate::types::{FileRecord, ReferenceToken};

/// An immutable listing of every file, taken once per scan.
/// Content is read on demand through the borrowed repository.
pub struct Corpus<'repo> {
    /// Every file, in repository listing order.
    files: Vec<FileRecord>,
    /// Source of file content for the duration of the scan.
    repo: &'repo dyn FileRepository,
}

impl<'repo> Corpus<'repo> {
    /// Take a snapshot of the repository's current listing.
    ///
    /// # Errors
    ///
    /// Returns the repository's listing error.
    pub fn snapshot(repo: &'repo dyn FileRepository) -> Result<Self, Error> {
        let files = repo.list_all_files()?;
        return Ok(Self { files, repo });
    }

    /// Every image attachment, in listing order.
    pub fn attachments(&self) -> impl Iterator<Item = &FileRecord> {
        return self.files.iter().filter(|f| return f.is_attachment());
    }

    /// Every canvas document, in listing order.
    pub fn canvases(&self) -> impl Iterator<Item = &FileRecord> {
        return self.files.iter().filter(|f| return f.is_canvas());
    }

    /// Every text document, in listing order.
    pub fn documents(&self) -> impl Iterator<Item = &FileRecord> {
        return self.files.iter().filter(|f| return f.is_document());
    }

    /// Every file, in listing order.
    pub fn files(&self) -> &[FileRecord] {
        return &self.files;
    }

    /// Build name/path/basename lookup tables over the snapshot.
    pub fn lookup(&self) -> FileLookup {
        return FileLookup::new(&self.files);
    }

    /// Read a file's text.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadFailed` if the repository cannot read it.
    pub fn read_text(&self, file: &FileRecord) -> Result<String, Error> {
        return self.repo.read_text(&file.path);
    }
}

/// Hash sets over a snapshot so existence checks don't rescan the file list.
pub struct FileLookup {
    /// Every `FileRecord::basename`.
    basenames: HashSet<String>,
    /// Every `FileRecord::name`.
    names: HashSet<String>,
    /// Every `FileRecord::path`.
    paths: HashSet<String>,
}

impl FileLookup {
    /// Index the given files.
    pub fn new(files: &[FileRecord]) -> Self {
        return Self {
            basenames: files.iter().map(|f| return f.basename.clone()).collect(),
            names: files.iter().map(|f| return f.name.clone()).collect(),
            paths: files.iter().map(|f| return f.path.clone()).collect(),
        };
    }

    /// Whether any file's basename equals `basename`.
    pub fn has_basename(&self, basename: &str) -> bool {
        return self.basenames.contains(basename);
    }

    /// Whether any file's path equals `path`.
    pub fn has_path(&self, path: &str) -> bool {
        return self.paths.contains(path);
    }

    /// Whether an attachment token resolves: some file has it as name or path,
    /// or has the token minus its extension as basename.
    pub fn resolves_attachment(&self, token: &ReferenceToken) -> bool {
        let token = token.as_str();
        if self.names.contains(token) || self.paths.contains(token) {
            return true;
        }
        let stem = token.rsplit_once('.').map_or(token, |(stem, _ext)| return stem);
        return self.basenames.contains(stem);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryRepository;

    #[test]
    fn snapshot_partitions_by_kind() {
        let repo = MemoryRepository::new()
            .with_file("a.md", "")
            .with_file("b.canvas", "{}")
            .with_file("c.PNG", "")
            .with_file("d.pdf", "");
        let corpus = Corpus::snapshot(&repo).unwrap();
        assert_eq!(corpus.files().len(), 4);
        assert_eq!(corpus.documents().count(), 1);
        assert_eq!(corpus.canvases().count(), 1);
        assert_eq!(corpus.attachments().map(|f| f.name.as_str()).collect::<Vec<_>>(), vec!["c.PNG"]);
    }

    #[test]
    fn attachment_resolution_by_name_path_or_basename() {
        let files = [
            FileRecord::from_path("assets/cat.png"),
            FileRecord::from_path("dog.jpg"),
        ];
        let lookup = FileLookup::new(&files);
        let token = |s: &str| ReferenceToken(s.to_string());
        assert!(lookup.resolves_attachment(&token("cat.png")));
        assert!(lookup.resolves_attachment(&token("dog.jpg")));
        // basename match ignores the extension the link was written with
        assert!(lookup.resolves_attachment(&token("dog.png")));
        assert!(!lookup.resolves_attachment(&token("bird.png")));
        // names are matched case-sensitively
        assert!(!lookup.resolves_attachment(&token("Cat.png")));
    }
}
