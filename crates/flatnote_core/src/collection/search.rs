//! Substring search over the in-memory collection.
//!
//! # Invariants
//! - Matching is case-insensitive over title, content and category.
//! - Hits keep collection order.
//! - An empty query matches every note; rejecting it is the caller's job.

use super::NoteCollection;
use crate::model::note::Note;

/// Single search hit with its position in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// Index usable with the collection mutators.
    pub index: usize,
    pub note: &'a Note,
}

impl NoteCollection {
    /// Returns every note whose title, content or category contains `query`.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let lowered = query.to_lowercase();
        self.iter()
            .enumerate()
            .filter(|(_, note)| note.matches_lowered(&lowered))
            .map(|(index, note)| SearchHit { index, note })
            .collect()
    }
}
