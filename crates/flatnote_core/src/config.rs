//! Store location configuration.
//!
//! # Responsibility
//! - Carry the notes/backup file paths into [`crate::store::FileNoteStore`].
//!
//! # Invariants
//! - Paths are plain values handed to the store at construction; nothing
//!   in core reads a process-wide path.

use std::path::{Path, PathBuf};

/// Default notes file name.
pub const DEFAULT_NOTES_FILE: &str = "notes.txt";
/// Default backup file name.
pub const DEFAULT_BACKUP_FILE: &str = "notes_backup.txt";
/// Default readable export file name.
pub const DEFAULT_EXPORT_FILE: &str = "notes_export.txt";

/// File locations used by one store instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Record file holding one encoded note per line.
    pub notes_path: PathBuf,
    /// Byte-for-byte copy target of [`StoreConfig::notes_path`].
    pub backup_path: PathBuf,
}

impl StoreConfig {
    pub fn new(notes_path: impl Into<PathBuf>, backup_path: impl Into<PathBuf>) -> Self {
        Self {
            notes_path: notes_path.into(),
            backup_path: backup_path.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(DEFAULT_NOTES_FILE), dir.join(DEFAULT_BACKUP_FILE))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NOTES_FILE, DEFAULT_BACKUP_FILE)
    }
}
