//! Note domain model.
//!
//! # Responsibility
//! - Define the in-memory record for one note and its timestamps.
//! - Express edits as value updates that return a refreshed record.
//!
//! # Invariants
//! - `created_at` is set once at creation and never changed by edits.
//! - Every title/content/category edit sets `last_modified` to the edit time.
//! - Category is never blank for notes built through [`Note::new`].
//!
//! # See also
//! - `codec::record` for the on-disk shape of this record.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Local wall-clock date-time without timezone, as persisted in the store.
pub type NoteTimestamp = NaiveDateTime;

/// Category assigned when the caller leaves it blank.
pub const DEFAULT_CATEGORY: &str = "General";

/// One short text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Display title. Non-empty by convention, not enforced here.
    pub title: String,
    /// Free text body. May span multiple lines and contain `|` or `\`.
    pub content: String,
    /// Grouping label, compared verbatim.
    pub category: String,
    /// Creation time.
    pub created_at: NoteTimestamp,
    /// Time of the latest title/content/category edit.
    pub last_modified: NoteTimestamp,
}

/// Single-field edit applied through [`Note::edited`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEdit {
    Title(String),
    Content(String),
    Category(String),
}

impl Note {
    /// Creates a note stamped with the current local time.
    ///
    /// A blank `category` falls back to [`DEFAULT_CATEGORY`].
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: Option<&str>,
    ) -> Self {
        Self::new_at(title, content, category, now())
    }

    /// Creates a note with an explicit creation time.
    pub fn new_at(
        title: impl Into<String>,
        content: impl Into<String>,
        category: Option<&str>,
        created_at: NoteTimestamp,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: normalize_category(category),
            created_at,
            last_modified: created_at,
        }
    }

    /// Rebuilds a note from persisted fields without touching any of them.
    ///
    /// Used by the record decoder; the category is kept verbatim.
    pub fn from_parts(
        title: String,
        content: String,
        category: String,
        created_at: NoteTimestamp,
        last_modified: NoteTimestamp,
    ) -> Self {
        Self {
            title,
            content,
            category,
            created_at,
            last_modified,
        }
    }

    /// Returns a copy with a new title, modified now.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.edited(NoteEdit::Title(title.into()))
    }

    /// Returns a copy with a new content body, modified now.
    pub fn with_content(self, content: impl Into<String>) -> Self {
        self.edited(NoteEdit::Content(content.into()))
    }

    /// Returns a copy with a new category, modified now.
    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.edited(NoteEdit::Category(category.into()))
    }

    /// Applies `edit` and stamps `last_modified` with the current time.
    pub fn edited(self, edit: NoteEdit) -> Self {
        self.edited_at(edit, now())
    }

    /// Applies `edit` and stamps `last_modified` with `at`.
    pub fn edited_at(mut self, edit: NoteEdit, at: NoteTimestamp) -> Self {
        match edit {
            NoteEdit::Title(title) => self.title = title,
            NoteEdit::Content(content) => self.content = content,
            NoteEdit::Category(category) => self.category = category,
        }
        self.last_modified = at;
        self
    }

    /// Case-insensitive substring match over title, content and category.
    ///
    /// `lowered_query` must already be lowercase.
    pub(crate) fn matches_lowered(&self, lowered_query: &str) -> bool {
        self.title.to_lowercase().contains(lowered_query)
            || self.content.to_lowercase().contains(lowered_query)
            || self.category.to_lowercase().contains(lowered_query)
    }
}

/// Maps a missing or blank category to [`DEFAULT_CATEGORY`].
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Current local wall-clock time.
pub fn now() -> NoteTimestamp {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::{normalize_category, Note, NoteEdit, DEFAULT_CATEGORY};
    use chrono::NaiveDate;

    fn at(hour: u32) -> super::NoteTimestamp {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn blank_category_defaults_to_general() {
        assert_eq!(normalize_category(None), DEFAULT_CATEGORY);
        assert_eq!(normalize_category(Some("   ")), DEFAULT_CATEGORY);
        assert_eq!(normalize_category(Some(" Work ")), "Work");
    }

    #[test]
    fn new_at_sets_both_timestamps() {
        let note = Note::new_at("t", "c", None, at(9));
        assert_eq!(note.created_at, at(9));
        assert_eq!(note.last_modified, at(9));
        assert_eq!(note.category, "General");
    }

    #[test]
    fn edit_refreshes_last_modified_only() {
        let note = Note::new_at("t", "c", Some("Work"), at(9));
        let edited = note.edited_at(NoteEdit::Category("Idea".to_string()), at(11));
        assert_eq!(edited.category, "Idea");
        assert_eq!(edited.created_at, at(9));
        assert_eq!(edited.last_modified, at(11));
    }

    #[test]
    fn edit_keeps_category_verbatim() {
        let note = Note::new_at("t", "c", Some("Work"), at(9));
        let edited = note.with_category("");
        assert_eq!(edited.category, "");
    }
}
