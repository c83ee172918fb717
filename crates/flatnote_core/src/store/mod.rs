//! Persistence contracts and flat-file implementation.
//!
//! # Responsibility
//! - Define the storage contract the note service depends on.
//! - Isolate file-system details (paths, handles, atomic replace) from
//!   collection and service logic.
//!
//! # Invariants
//! - Malformed records never fail a load; they are reported per line.
//! - A missing notes or backup file is an outcome, not an error.
//! - No file handle outlives the call that opened it.
//!
//! # See also
//! - `codec::record` for the line format.

use crate::codec::record::FormatError;
use crate::model::note::{Note, NoteTimestamp};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub mod export;
mod file_store;

pub use export::{render_export, DISPLAY_TIMESTAMP_FORMAT};
pub use file_store::{parse_notes_file, FileNoteStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer failure.
#[derive(Debug)]
pub enum StoreError {
    /// A file could not be opened, read, written or replaced.
    Io { path: PathBuf, source: io::Error },
    /// Backup and notes locations resolve to the same file.
    SameFile { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error on `{}`: {source}", path.display()),
            Self::SameFile { path } => write!(
                f,
                "backup and notes file are the same file `{}`",
                path.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::SameFile { .. } => None,
        }
    }
}

/// Record line that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based physical line number in the notes file.
    pub line_number: usize,
    pub error: FormatError,
}

impl Display for SkippedLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line_number, self.error)
    }
}

/// Best-effort load result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Successfully decoded notes in file order.
    pub notes: Vec<Note>,
    /// Lines that failed to decode, in file order.
    pub skipped: Vec<SkippedLine>,
}

/// Outcome of a whole-file copy (backup or restore).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Source copied over the destination.
    Copied { bytes: u64 },
    /// Source file does not exist; nothing was touched.
    SourceMissing,
}

/// Observed state of one store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    /// Local last-modified time; `None` when absent or unsupported.
    pub modified: Option<NoteTimestamp>,
}

impl FileInfo {
    pub(crate) fn absent(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            exists: false,
            size_bytes: 0,
            modified: None,
        }
    }
}

/// Notes and backup file state, observed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub notes: FileInfo,
    pub backup: FileInfo,
}

/// Storage contract for the note collection.
pub trait NoteStorage {
    /// Loads every decodable note; missing file yields an empty report.
    fn load(&self) -> StoreResult<LoadReport>;
    /// Replaces the stored collection with `notes`.
    fn save(&self, notes: &[Note]) -> StoreResult<()>;
    /// Copies the notes file to the backup location.
    fn create_backup(&self) -> StoreResult<CopyOutcome>;
    /// Copies the backup over the notes file. Callers reload afterwards.
    fn restore_from_backup(&self) -> StoreResult<CopyOutcome>;
    /// Writes a human-readable, one-way rendering of `notes` to `path`.
    fn export_readable(&self, notes: &[Note], path: &Path) -> StoreResult<()>;
    /// Reports existence, size and modification time of both files.
    fn file_stats(&self) -> StoreResult<FileStats>;
}
