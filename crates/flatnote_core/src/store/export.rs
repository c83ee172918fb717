//! Human-readable export rendering.
//!
//! The output is one-way: there is no decoder for it.

use crate::model::note::{Note, NoteTimestamp};
use std::fmt::Write;

/// Timestamp layout used in readable output.
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SEPARATOR_WIDTH: usize = 51;
const NOTE_RULE_WIDTH: usize = 20;

/// Renders `notes` as a readable export stamped with `exported_at`.
pub fn render_export(notes: &[Note], exported_at: NoteTimestamp) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let rule = "-".repeat(NOTE_RULE_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== NOTES EXPORT ===");
    let _ = writeln!(
        out,
        "Export Date: {}",
        exported_at.format(DISPLAY_TIMESTAMP_FORMAT)
    );
    let _ = writeln!(out, "Total Notes: {}", notes.len());
    let _ = writeln!(out, "{separator}");
    out.push('\n');

    for (idx, note) in notes.iter().enumerate() {
        let _ = writeln!(out, "Note #{}", idx + 1);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Title: {}", note.title);
        let _ = writeln!(out, "Category: {}", note.category);
        let _ = writeln!(
            out,
            "Created: {}",
            note.created_at.format(DISPLAY_TIMESTAMP_FORMAT)
        );
        let _ = writeln!(
            out,
            "Modified: {}",
            note.last_modified.format(DISPLAY_TIMESTAMP_FORMAT)
        );
        out.push('\n');
        let _ = writeln!(out, "Content:");
        let _ = writeln!(out, "{}", note.content);
        out.push('\n');
        let _ = writeln!(out, "{separator}");
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::render_export;
    use crate::model::note::Note;
    use chrono::NaiveDate;

    #[test]
    fn empty_export_has_header_only() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let rendered = render_export(&[], at);
        assert!(rendered.starts_with("=== NOTES EXPORT ===\nExport Date: 2024-05-02 08:15:00\n"));
        assert!(rendered.contains("Total Notes: 0\n"));
        assert!(!rendered.contains("Note #"));
    }

    #[test]
    fn note_block_keeps_multiline_content_verbatim() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let note = Note::new_at("Plan", "line one\nline | two", Some("Work"), at);
        let rendered = render_export(&[note], at);
        assert!(rendered.contains(
            "Note #1\n--------------------\nTitle: Plan\nCategory: Work\n\
             Created: 2024-05-02 08:15:00\nModified: 2024-05-02 08:15:00\n\n\
             Content:\nline one\nline | two\n\n"
        ));
    }
}
