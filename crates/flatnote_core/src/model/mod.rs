//! Domain model for the note collection.
//!
//! # Responsibility
//! - Define the canonical note record used by codec, store and collection.
//!
//! # Invariants
//! - Notes are plain values; edits produce new values instead of mutating
//!   through setters.

pub mod note;
