//! Category grouping and aggregate statistics.
//!
//! # Invariants
//! - Categories are compared verbatim ("work" and "Work" differ).
//! - A word is a maximal run of non-whitespace characters.
//! - Characters are counted as Unicode scalar values.

use super::NoteCollection;
use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("valid word regex"));

/// Aggregate figures over a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteStatistics {
    pub total_notes: usize,
    /// Note count per category, sorted by category.
    pub category_counts: BTreeMap<String, usize>,
    pub total_words: usize,
    pub total_characters: usize,
    /// `total_words / total_notes`, truncated. `None` when empty.
    pub average_words_per_note: Option<usize>,
}

impl NoteCollection {
    /// Partitions notes by category, keeping collection order per group.
    pub fn group_by_category(&self) -> BTreeMap<&str, Vec<&Note>> {
        let mut groups: BTreeMap<&str, Vec<&Note>> = BTreeMap::new();
        for note in self {
            groups.entry(note.category.as_str()).or_default().push(note);
        }
        groups
    }

    /// Computes counts, word and character totals.
    pub fn statistics(&self) -> NoteStatistics {
        let mut stats = NoteStatistics {
            total_notes: self.len(),
            ..NoteStatistics::default()
        };

        for note in self {
            *stats
                .category_counts
                .entry(note.category.clone())
                .or_insert(0) += 1;
            stats.total_words += count_words(&note.content);
            stats.total_characters += note.content.chars().count();
        }

        stats.average_words_per_note = stats.total_words.checked_div(stats.total_notes);
        stats
    }
}

/// Counts maximal non-whitespace runs in `text`.
pub fn count_words(text: &str) -> usize {
    WORD_RE.find_iter(text).count()
}

#[cfg(test)]
mod tests {
    use super::count_words;
    use crate::collection::NoteCollection;

    #[test]
    fn word_count_ignores_surrounding_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("  one\ttwo\n\nthree  "), 3);
    }

    #[test]
    fn empty_collection_has_no_average() {
        let stats = NoteCollection::new().statistics();
        assert_eq!(stats.total_notes, 0);
        assert_eq!(stats.average_words_per_note, None);
        assert!(stats.category_counts.is_empty());
    }
}
