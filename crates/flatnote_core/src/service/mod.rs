//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection mutations and storage calls into use-cases.
//! - Keep front-ends decoupled from file-system details.

pub mod note_service;
