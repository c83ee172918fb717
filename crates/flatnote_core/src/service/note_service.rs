//! Note use-case service.
//!
//! # Responsibility
//! - Own the loaded collection and its storage.
//! - Persist the whole collection after every add/edit/delete.
//! - Reload the collection after a restore from backup.
//!
//! # Invariants
//! - A failed save never rolls back the in-memory mutation; the caller is
//!   told via [`NoteServiceError::NotPersisted`].
//! - Edits go through [`Note::edited`], so `last_modified` is always
//!   refreshed and `created_at` never changes.

use crate::collection::{CollectionError, NoteCollection};
use crate::model::note::{Note, NoteEdit};
use crate::store::{CopyOutcome, FileStats, NoteStorage, SkippedLine, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Target index does not exist.
    Collection(CollectionError),
    /// Storage failure outside a mutation (load, backup, export, stats).
    Store(StoreError),
    /// Mutation applied in memory but the save failed.
    NotPersisted(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotPersisted(err) => write!(f, "change kept in memory but not saved: {err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Collection(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotPersisted(err) => Some(err),
        }
    }
}

impl From<CollectionError> for NoteServiceError {
    fn from(value: CollectionError) -> Self {
        Self::Collection(value)
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over a storage implementation.
pub struct NoteService<S: NoteStorage> {
    storage: S,
    notes: NoteCollection,
}

impl<S: NoteStorage> NoteService<S> {
    /// Loads the stored collection.
    ///
    /// Returns the service plus the lines skipped as malformed.
    pub fn open(storage: S) -> NoteServiceResult<(Self, Vec<SkippedLine>)> {
        let report = storage.load()?;
        let service = Self {
            storage,
            notes: NoteCollection::from_notes(report.notes),
        };
        Ok((service, report.skipped))
    }

    pub fn notes(&self) -> &NoteCollection {
        &self.notes
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates a note stamped now, appends it and saves.
    pub fn add_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: Option<&str>,
    ) -> NoteServiceResult<&Note> {
        self.notes.push(Note::new(title, content, category));
        self.persist()?;
        let last = self.notes.len() - 1;
        Ok(&self.notes.as_slice()[last])
    }

    /// Applies `edit` to the note at `index` and saves.
    pub fn edit_note(&mut self, index: usize, edit: NoteEdit) -> NoteServiceResult<&Note> {
        let current = self
            .notes
            .get(index)
            .cloned()
            .ok_or(CollectionError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            })?;
        self.notes.replace(index, current.edited(edit))?;
        self.persist()?;
        Ok(&self.notes.as_slice()[index])
    }

    /// Removes the note at `index`, saves, and returns it.
    ///
    /// On [`NoteServiceError::NotPersisted`] the note is already gone from
    /// memory.
    pub fn delete_note(&mut self, index: usize) -> NoteServiceResult<Note> {
        let removed = self.notes.remove(index)?;
        self.persist()?;
        Ok(removed)
    }

    /// Saves the current collection.
    pub fn save(&self) -> NoteServiceResult<()> {
        self.persist()
    }

    /// Replaces the in-memory collection with the stored one.
    pub fn reload(&mut self) -> NoteServiceResult<Vec<SkippedLine>> {
        let report = self.storage.load()?;
        self.notes = NoteCollection::from_notes(report.notes);
        Ok(report.skipped)
    }

    pub fn create_backup(&self) -> NoteServiceResult<CopyOutcome> {
        Ok(self.storage.create_backup()?)
    }

    /// Restores the backup and reloads when a copy happened.
    pub fn restore_from_backup(&mut self) -> NoteServiceResult<(CopyOutcome, Vec<SkippedLine>)> {
        let outcome = self.storage.restore_from_backup()?;
        let skipped = match outcome {
            CopyOutcome::Copied { .. } => self.reload()?,
            CopyOutcome::SourceMissing => Vec::new(),
        };
        info!(
            "event=restore_reload module=service status=ok notes={} skipped={}",
            self.notes.len(),
            skipped.len()
        );
        Ok((outcome, skipped))
    }

    pub fn export(&self, path: &Path) -> NoteServiceResult<()> {
        Ok(self.storage.export_readable(self.notes.as_slice(), path)?)
    }

    pub fn file_stats(&self) -> NoteServiceResult<FileStats> {
        Ok(self.storage.file_stats()?)
    }

    fn persist(&self) -> NoteServiceResult<()> {
        self.storage.save(self.notes.as_slice()).map_err(|err| {
            warn!(
                "event=mutation_not_persisted module=service notes={}",
                self.notes.len()
            );
            NoteServiceError::NotPersisted(err)
        })
    }
}
