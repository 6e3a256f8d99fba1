//! Link integrity auditing for markdown vaults.
//!
//! Finds attachment references that point at nothing, attachments nothing
//! points at, and wikilinks to documents that do not exist. Findings live in a
//! [`results::ResultSet`] that corrective actions (move an attachment, create a
//! missing document) update in place without rescanning the vault.
//!
//! ```no_run
//! use linkspy::{FsRepository, ScanKind, Session, Settings};
//!
//! let root = std::path::Path::new("vault");
//! let settings = Settings::load(root)?;
//! let mut session = Session::new(FsRepository::new(root), settings);
//! let results = session.run_scan(ScanKind::UnusedAttachments)?;
//! println!("{}", results.summary());
//! # Ok::<(), linkspy::Error>(())
//! ```

pub mod actions;
pub mod backlinks;
pub mod canvas;
pub mod commands;
pub mod config;
pub mod config_edit;
pub mod corpus;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod index;
pub mod info;
pub mod missing;
pub mod report;
pub mod repository;
pub mod results;
pub mod scan;
pub mod session;
pub mod types;
pub mod unused;
pub mod watch;

pub use actions::{Action, ActionOutcome};
pub use config::Settings;
pub use error::Error;
pub use repository::{FileRepository, FsRepository, MemoryRepository};
pub use results::ResultSet;
pub use scan::ScanKind;
pub use session::Session;
