//! Flat-file note store.
//!
//! # Responsibility
//! - Read/write the notes file through the record codec.
//! - Provide byte-for-byte backup/restore and readable export.
//!
//! # Invariants
//! - `save` replaces the notes file through a sibling temp file + rename,
//!   so readers never observe a half-written collection. The replaced file
//!   keeps its permissions, and a symlinked notes file keeps its link.
//! - Backup/restore never copy a file onto itself.
//! - One bad line is skipped and reported with its 1-based line number.
//! - Handles are scoped to a single call.

use super::export::render_export;
use super::{
    CopyOutcome, FileInfo, FileStats, LoadReport, NoteStorage, SkippedLine, StoreError,
    StoreResult,
};
use crate::codec::record::{decode_record, encode_record, FormatError};
use crate::config::StoreConfig;
use crate::model::note::{now, Note};
use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// [`NoteStorage`] backed by a notes file and a backup file.
#[derive(Debug, Clone)]
pub struct FileNoteStore {
    config: StoreConfig,
}

impl FileNoteStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl NoteStorage for FileNoteStore {
    fn load(&self) -> StoreResult<LoadReport> {
        let started_at = Instant::now();
        let path = self.config.notes_path.as_path();

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=store_load module=store status=ok notes=0 skipped=0 reason=no_file");
                return Ok(LoadReport::default());
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=read_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(StoreError::io(path, err));
            }
        };

        let report = parse_notes_file(&bytes);
        for skipped in &report.skipped {
            warn!(
                "event=record_skipped module=store line={} error={}",
                skipped.line_number, skipped.error
            );
        }
        info!(
            "event=store_load module=store status=ok notes={} skipped={} duration_ms={}",
            report.notes.len(),
            report.skipped.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    fn save(&self, notes: &[Note]) -> StoreResult<()> {
        let started_at = Instant::now();
        let path = self.config.notes_path.as_path();

        match write_records(path, notes) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok notes={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn create_backup(&self) -> StoreResult<CopyOutcome> {
        let outcome = copy_file(&self.config.notes_path, &self.config.backup_path)?;
        log_copy("store_backup", outcome);
        Ok(outcome)
    }

    fn restore_from_backup(&self) -> StoreResult<CopyOutcome> {
        let outcome = copy_file(&self.config.backup_path, &self.config.notes_path)?;
        log_copy("store_restore", outcome);
        Ok(outcome)
    }

    fn export_readable(&self, notes: &[Note], path: &Path) -> StoreResult<()> {
        let rendered = render_export(notes, now());
        let result = File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            writer.write_all(rendered.as_bytes())?;
            writer.flush()
        });

        match result {
            Ok(()) => {
                info!(
                    "event=store_export module=store status=ok notes={}",
                    notes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_export module=store status=error error_code=write_failed error={}",
                    err
                );
                Err(StoreError::io(path, err))
            }
        }
    }

    fn file_stats(&self) -> StoreResult<FileStats> {
        Ok(FileStats {
            notes: file_info(&self.config.notes_path)?,
            backup: file_info(&self.config.backup_path)?,
        })
    }
}

/// Decodes raw notes-file bytes into a best-effort [`LoadReport`].
///
/// Lines are LF-terminated; a trailing CR is stripped. Blank lines are
/// ignored but still counted for line numbers.
pub fn parse_notes_file(bytes: &[u8]) -> LoadReport {
    let mut report = LoadReport::default();

    for (idx, raw) in bytes.split(|byte| *byte == b'\n').enumerate() {
        let line_number = idx + 1;
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(_) => {
                report.skipped.push(SkippedLine {
                    line_number,
                    error: FormatError::InvalidUtf8,
                });
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match decode_record(line) {
            Ok(note) => report.notes.push(note),
            Err(error) => report.skipped.push(SkippedLine { line_number, error }),
        }
    }

    report
}

fn write_records(path: &Path, notes: &[Note]) -> StoreResult<()> {
    let target = resolve_symlink(path)?;
    let path = target.as_path();
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

    let mut staged = NamedTempFile::new_in(dir).map_err(|err| StoreError::io(dir, err))?;
    match fs::metadata(path) {
        Ok(existing) => staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(|err| StoreError::io(path, err))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(StoreError::io(path, err)),
    }
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        for note in notes {
            writeln!(writer, "{}", encode_record(note)).map_err(|err| StoreError::io(path, err))?;
        }
        writer.flush().map_err(|err| StoreError::io(path, err))?;
    }

    staged
        .persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;
    Ok(())
}

fn copy_file(source: &Path, destination: &Path) -> StoreResult<CopyOutcome> {
    match fs::metadata(source) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(CopyOutcome::SourceMissing);
        }
        Err(err) => return Err(StoreError::io(source, err)),
    }
    if same_file(source, destination)? {
        return Err(StoreError::SameFile {
            path: destination.to_path_buf(),
        });
    }

    let dir = parent_dir(destination);
    fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;
    let bytes = fs::copy(source, destination).map_err(|err| StoreError::io(destination, err))?;
    Ok(CopyOutcome::Copied { bytes })
}

fn file_info(path: &Path) -> StoreResult<FileInfo> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(FileInfo {
            path: path.to_path_buf(),
            exists: true,
            size_bytes: metadata.len(),
            modified: metadata
                .modified()
                .ok()
                .map(|time| DateTime::<Local>::from(time).naive_local()),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(FileInfo::absent(path)),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Follows a symlinked notes file so the rename replaces the link target.
fn resolve_symlink(path: &Path) -> StoreResult<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            let link = fs::read_link(path).map_err(|err| StoreError::io(path, err))?;
            Ok(if link.is_absolute() {
                link
            } else {
                parent_dir(path).join(link)
            })
        }
        _ => Ok(path.to_path_buf()),
    }
}

fn same_file(source: &Path, destination: &Path) -> StoreResult<bool> {
    let source = fs::canonicalize(source).map_err(|err| StoreError::io(source, err))?;
    match fs::canonicalize(destination) {
        Ok(destination) => Ok(source == destination),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(StoreError::io(destination, err)),
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn log_copy(event: &str, outcome: CopyOutcome) {
    match outcome {
        CopyOutcome::Copied { bytes } => {
            info!("event={event} module=store status=ok bytes={bytes}");
        }
        CopyOutcome::SourceMissing => {
            info!("event={event} module=store status=skipped reason=source_missing");
        }
    }
}
