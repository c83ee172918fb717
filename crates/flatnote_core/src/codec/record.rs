//! Single-line record codec for notes.
//!
//! # Responsibility
//! - Encode one [`Note`] as one physical line of the notes file.
//! - Decode one line back into a [`Note`], reporting malformed records.
//!
//! # Invariants
//! - Encoded lines contain no raw LF/CR and no unescaped delimiter.
//! - `decode_record(&encode_record(n)) == Ok(n)` for every note.
//! - `split_fields` is the exact inverse of escaping: a backslash always
//!   consumes the character that follows it.
//!
//! # Format
//! `title|content|category|created_at|last_modified`, where text fields
//! escape `\` as `\\`, `|` as `\|`, LF as `\n` and CR as `\r`.

use crate::model::note::{Note, NoteTimestamp};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field delimiter of the record format.
pub const DELIMITER: char = '|';
/// Escape prefix of the record format.
pub const ESCAPE: char = '\\';
/// Number of fields in one record.
pub const FIELD_COUNT: usize = 5;
/// Sortable local date-time layout; fraction is emitted only when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Timestamp column that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    CreatedAt,
    LastModified,
}

impl Display for TimestampField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreatedAt => f.write_str("created_at"),
            Self::LastModified => f.write_str("last_modified"),
        }
    }
}

/// Malformed record error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Line did not split into exactly [`FIELD_COUNT`] fields.
    FieldCount { found: usize },
    /// Timestamp column is not in [`TIMESTAMP_FORMAT`].
    InvalidTimestamp {
        field: TimestampField,
        value: String,
    },
    /// Line bytes are not valid UTF-8.
    InvalidUtf8,
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount { found } => {
                write!(f, "expected {FIELD_COUNT} fields, found {found}")
            }
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid {field} timestamp `{value}`")
            }
            Self::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

impl Error for FormatError {}

/// Encodes one note as a single line (without the trailing newline).
pub fn encode_record(note: &Note) -> String {
    let mut line = String::with_capacity(
        note.title.len() + note.content.len() + note.category.len() + 64,
    );
    escape_into(&note.title, &mut line);
    line.push(DELIMITER);
    escape_into(&note.content, &mut line);
    line.push(DELIMITER);
    escape_into(&note.category, &mut line);
    line.push(DELIMITER);
    line.push_str(&format_timestamp(&note.created_at));
    line.push(DELIMITER);
    line.push_str(&format_timestamp(&note.last_modified));
    line
}

/// Decodes one line produced by [`encode_record`].
///
/// # Errors
/// - [`FormatError::FieldCount`] when the line does not hold five fields.
/// - [`FormatError::InvalidTimestamp`] when a timestamp does not parse.
pub fn decode_record(line: &str) -> Result<Note, FormatError> {
    let fields = split_fields(line);
    if fields.len() != FIELD_COUNT {
        return Err(FormatError::FieldCount {
            found: fields.len(),
        });
    }

    let created_at = parse_timestamp(fields[3], TimestampField::CreatedAt)?;
    let last_modified = parse_timestamp(fields[4], TimestampField::LastModified)?;

    Ok(Note::from_parts(
        unescape_field(fields[0]),
        unescape_field(fields[1]),
        unescape_field(fields[2]),
        created_at,
        last_modified,
    ))
}

/// Escapes one text field.
pub fn escape_field(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    escape_into(raw, &mut out);
    out
}

/// Reverses [`escape_field`].
///
/// Unknown escapes (`\x`) and a trailing lone backslash are kept literally,
/// so records written without backslash escaping still decode.
pub fn unescape_field(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != ESCAPE {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(ESCAPE) => out.push(ESCAPE),
            Some(DELIMITER) => out.push(DELIMITER),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }
    out
}

/// Splits a line on unescaped delimiters, leaving each field escaped.
pub fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(FIELD_COUNT);
    let mut start = 0;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == ESCAPE {
            escaped = true;
        } else if ch == DELIMITER {
            fields.push(&line[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    fields.push(&line[start..]);
    fields
}

/// Formats a timestamp in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(value: &NoteTimestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(value: &str, field: TimestampField) -> Result<NoteTimestamp, FormatError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|_| {
        FormatError::InvalidTimestamp {
            field,
            value: value.to_string(),
        }
    })
}

fn escape_into(raw: &str, out: &mut String) {
    for ch in raw.chars() {
        match ch {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
}
