//! Core domain logic for FlatNote.
//! This crate is the single source of truth for the note file format and
//! every invariant built on it.

pub mod codec;
pub mod collection;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use codec::record::{decode_record, encode_record, FormatError, TimestampField};
pub use collection::{CollectionError, NoteCollection, NoteStatistics, SearchHit};
pub use config::{StoreConfig, DEFAULT_BACKUP_FILE, DEFAULT_EXPORT_FILE, DEFAULT_NOTES_FILE};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteEdit, NoteTimestamp, DEFAULT_CATEGORY};
pub use service::note_service::{NoteService, NoteServiceError, NoteServiceResult};
pub use store::{
    CopyOutcome, FileInfo, FileNoteStore, FileStats, LoadReport, NoteStorage, SkippedLine,
    StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
