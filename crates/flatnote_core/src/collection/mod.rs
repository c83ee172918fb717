//! In-memory note collection.
//!
//! # Responsibility
//! - Hold notes in insertion order and expose index-based mutators.
//! - Host read-only collection queries (search, grouping, statistics).
//!
//! # Invariants
//! - Insertion order is the canonical iteration and display order.
//! - Titles and categories are not unique.

use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod search;
pub mod stats;

pub use search::SearchHit;
pub use stats::NoteStatistics;

/// Collection mutation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionError {
    /// Index does not address an existing note.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "note index {index} out of range (collection has {len})")
            }
        }
    }
}

impl Error for CollectionError {}

/// Ordered, owned sequence of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    /// Appends a note at the end.
    pub fn push(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Replaces the note at `index`, returning the previous value.
    pub fn replace(&mut self, index: usize, note: Note) -> Result<Note, CollectionError> {
        let len = self.notes.len();
        let slot = self
            .notes
            .get_mut(index)
            .ok_or(CollectionError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, note))
    }

    /// Removes the note at `index`, shifting later notes down.
    pub fn remove(&mut self, index: usize) -> Result<Note, CollectionError> {
        self.check_index(index)?;
        Ok(self.notes.remove(index))
    }

    pub fn into_notes(self) -> Vec<Note> {
        self.notes
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), CollectionError> {
        if index < self.notes.len() {
            Ok(())
        } else {
            Err(CollectionError::IndexOutOfRange {
                index,
                len: self.notes.len(),
            })
        }
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl From<Vec<Note>> for NoteCollection {
    fn from(notes: Vec<Note>) -> Self {
        Self::from_notes(notes)
    }
}
