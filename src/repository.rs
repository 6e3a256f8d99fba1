//! The file repository the engine scans and mutates.
//!
//! Scans only read through this trait; corrective actions call its create and
//! move primitives and treat each call as atomic. `FsRepository` serves a vault
//! directory on disk, `MemoryRepository` keeps a vault in memory.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::Error;
use crate::types::FileRecord;

/// Storage and mutation primitives of a vault. Paths are vault-relative and `/`-separated.
pub trait FileRepository {
    /// Create a file with `content`. Fails if the path is taken.
    ///
    /// # Errors
    ///
    /// Returns `Error::CreateFailed` if the file exists or cannot be written.
    fn create_file(&mut self, path: &str, content: &str) -> Result<FileRecord, Error>;

    /// Create a folder and its parents. Succeeds if it already exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::CreateFailed` if the folder cannot be created.
    fn create_folder(&mut self, path: &str) -> Result<(), Error>;

    /// Look up a file by exact path.
    fn exists(&self, path: &str) -> Option<FileRecord>;

    /// Every file in the vault, in a stable listing order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the vault cannot be listed.
    fn list_all_files(&self) -> Result<Vec<FileRecord>, Error>;

    /// Text documents only, in listing order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the vault cannot be listed.
    fn list_documents(&self) -> Result<Vec<FileRecord>, Error> {
        let files = self.list_all_files()?;
        return Ok(files.into_iter().filter(FileRecord::is_document).collect());
    }

    /// Move `record` to `new_path`. Fails if the destination is occupied.
    ///
    /// # Errors
    ///
    /// Returns `Error::MoveFailed` if the destination is invalid or occupied.
    fn move_file(&mut self, record: &FileRecord, new_path: &str) -> Result<FileRecord, Error>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns `Error::ReadFailed` if the file is missing or unreadable.
    fn read_text(&self, path: &str) -> Result<String, Error>;
}

// ── Disk-backed vault ─────────────────────────────────────────────────

/// A vault rooted at a directory on disk. Hidden entries (`.obsidian`, `.trash`, `.git`) are skipped.
#[derive(Debug, Clone)]
pub struct FsRepository {
    /// Vault root directory.
    root: PathBuf,
}

impl FsRepository {
    /// Serve the vault under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        return Self { root: root.into() };
    }

    /// Vault root directory.
    pub fn root(&self) -> &Path {
        return &self.root;
    }

    /// Map a vault path onto disk. Returns `None` for paths that would leave the vault.
    fn disk_path(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| return !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        return Some(self.root.join(relative));
    }

    /// Convert a walked entry into a `/`-separated vault path.
    fn vault_path(&self, entry: &DirEntry) -> Option<String> {
        let relative = entry.path().strip_prefix(&self.root).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| return c.as_os_str().to_string_lossy().into_owned())
            .collect();
        return Some(segments.join("/"));
    }
}

/// Whether a walked entry is a dotfile or dot-directory.
fn is_hidden(entry: &DirEntry) -> bool {
    return entry.file_name().to_string_lossy().starts_with('.');
}

impl FileRepository for FsRepository {
    fn create_file(&mut self, path: &str, content: &str) -> Result<FileRecord, Error> {
        let create_failed = |reason: String| {
            return Error::CreateFailed { path: path.to_string(), reason };
        };
        let disk = self.disk_path(path).ok_or_else(|| return create_failed("path escapes the vault".to_string()))?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&disk)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    return create_failed("file already exists".to_string());
                }
                return create_failed(e.to_string());
            })?;
        file.write_all(content.as_bytes()).map_err(|e| return create_failed(e.to_string()))?;

        return Ok(FileRecord::from_path(path.trim_start_matches('/')));
    }

    fn create_folder(&mut self, path: &str) -> Result<(), Error> {
        let disk = self.disk_path(path).ok_or_else(|| {
            return Error::CreateFailed { path: path.to_string(), reason: "path escapes the vault".to_string() };
        })?;
        std::fs::create_dir_all(&disk)
            .map_err(|e| return Error::CreateFailed { path: path.to_string(), reason: e.to_string() })?;
        return Ok(());
    }

    fn exists(&self, path: &str) -> Option<FileRecord> {
        let disk = self.disk_path(path)?;
        if !disk.is_file() {
            return None;
        }
        return Some(FileRecord::from_path(path.trim_start_matches('/')));
    }

    fn list_all_files(&self) -> Result<Vec<FileRecord>, Error> {
        if !self.root.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("vault root is not a directory: {}", self.root.display()),
            )));
        }

        let files = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| return e.depth() == 0 || !is_hidden(e))
            .filter_map(Result::ok)
            .filter(|e| return e.file_type().is_file())
            .filter_map(|e| return self.vault_path(&e))
            .map(|path| return FileRecord::from_path(&path))
            .collect();
        return Ok(files);
    }

    fn move_file(&mut self, record: &FileRecord, new_path: &str) -> Result<FileRecord, Error> {
        let move_failed = |reason: &str| {
            return Error::MoveFailed {
                from: record.path.clone(),
                reason: reason.to_string(),
                to: new_path.to_string(),
            };
        };
        let from = self.disk_path(&record.path).ok_or_else(|| return move_failed("path escapes the vault"))?;
        let to = self.disk_path(new_path).ok_or_else(|| return move_failed("path escapes the vault"))?;

        if to.exists() {
            return Err(move_failed("destination is occupied"));
        }
        if to.parent().is_some_and(|parent| return !parent.is_dir()) {
            return Err(move_failed("destination folder does not exist"));
        }
        std::fs::rename(&from, &to).map_err(|e| return move_failed(&e.to_string()))?;

        return Ok(FileRecord::from_path(new_path.trim_start_matches('/')));
    }

    fn read_text(&self, path: &str) -> Result<String, Error> {
        let read_failed = |reason: String| {
            return Error::ReadFailed { path: path.to_string(), reason };
        };
        let disk = self.disk_path(path).ok_or_else(|| return read_failed("path escapes the vault".to_string()))?;
        return std::fs::read_to_string(&disk).map_err(|e| return read_failed(e.to_string()));
    }
}

// ── In-memory vault ───────────────────────────────────────────────────

/// Stored state of one in-memory file.
#[derive(Debug, Clone)]
enum MemoryFile {
    /// Listed, but every read fails.
    Unreadable,
    /// Readable text content.
    Text(String),
}

/// A vault held in memory, listed in path order. Folders are tracked separately
/// so idempotent folder creation can be observed.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    /// Files by vault path.
    files: BTreeMap<String, MemoryFile>,
    /// Folders created through `create_folder`.
    folders: BTreeSet<String>,
}

impl MemoryRepository {
    /// An empty vault.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Current text of a file, if present and readable.
    pub fn content(&self, path: &str) -> Option<&str> {
        return match self.files.get(path) {
            Some(MemoryFile::Text(text)) => Some(text),
            Some(MemoryFile::Unreadable) | None => None,
        };
    }

    /// Folders created so far.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        return self.folders.iter().map(String::as_str);
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: &str, content: &str) {
        self.files.insert(path.to_string(), MemoryFile::Text(content.to_string()));
    }

    /// Builder form of [`MemoryRepository::insert`].
    #[must_use]
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.insert(path, content);
        return self;
    }

    /// Add a file that is listed but cannot be read.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), MemoryFile::Unreadable);
        return self;
    }
}

impl FileRepository for MemoryRepository {
    fn create_file(&mut self, path: &str, content: &str) -> Result<FileRecord, Error> {
        if self.files.contains_key(path) {
            return Err(Error::CreateFailed {
                path: path.to_string(),
                reason: "file already exists".to_string(),
            });
        }
        self.insert(path, content);
        return Ok(FileRecord::from_path(path));
    }

    fn create_folder(&mut self, path: &str) -> Result<(), Error> {
        let folder = path.trim_matches('/');
        if !folder.is_empty() {
            self.folders.insert(folder.to_string());
        }
        return Ok(());
    }

    fn exists(&self, path: &str) -> Option<FileRecord> {
        return self.files.contains_key(path).then(|| return FileRecord::from_path(path));
    }

    fn list_all_files(&self) -> Result<Vec<FileRecord>, Error> {
        return Ok(self.files.keys().map(|path| return FileRecord::from_path(path)).collect());
    }

    fn move_file(&mut self, record: &FileRecord, new_path: &str) -> Result<FileRecord, Error> {
        let move_failed = |reason: &str| {
            return Error::MoveFailed {
                from: record.path.clone(),
                reason: reason.to_string(),
                to: new_path.to_string(),
            };
        };
        if self.files.contains_key(new_path) {
            return Err(move_failed("destination is occupied"));
        }
        let file = self.files.remove(&record.path).ok_or_else(|| return move_failed("source does not exist"))?;
        self.files.insert(new_path.to_string(), file);
        return Ok(FileRecord::from_path(new_path));
    }

    fn read_text(&self, path: &str) -> Result<String, Error> {
        return match self.files.get(path) {
            Some(MemoryFile::Text(text)) => Ok(text.clone()),
            Some(MemoryFile::Unreadable) => Err(Error::ReadFailed {
                path: path.to_string(),
                reason: "permission denied".to_string(),
            }),
            None => Err(Error::ReadFailed {
                path: path.to_string(),
                reason: "no such file".to_string(),
            }),
        };
    }
}
