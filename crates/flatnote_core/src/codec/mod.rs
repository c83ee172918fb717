//! Flat-file record encoding.
//!
//! # Responsibility
//! - Own the one-note-per-line text format and its escaping rules.
//! - Keep format details out of the store and service layers.

pub mod record;
