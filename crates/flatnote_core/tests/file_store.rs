use flatnote_core::{
    encode_record, CopyOutcome, FileNoteStore, FormatError, Note, NoteStorage, StoreConfig,
    StoreError,
};
use std::fs;

fn sample_notes() -> Vec<Note> {
    vec![
        Note::new("Shopping List", "milk\neggs | bread", Some("Personal")),
        Note::new("Meeting Notes", "budget review", Some("Work")),
        Note::new("Paths", "C:\\temp and literal \\n", None),
    ]
}

#[test]
fn load_missing_file_returns_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));

    let report = store.load().unwrap();
    assert!(report.notes.is_empty());
    assert!(report.skipped.is_empty());
}

#[test]
fn save_then_load_preserves_collection_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));
    let notes = sample_notes();

    store.save(&notes).unwrap();
    let report = store.load().unwrap();
    assert_eq!(report.notes, notes);
    assert!(report.skipped.is_empty());

    let raw = fs::read_to_string(dir.path().join("notes.txt")).unwrap();
    assert_eq!(raw.lines().count(), 3);
    assert!(raw.ends_with('\n'));
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));

    store.save(&sample_notes()).unwrap();
    store.save(&sample_notes()[..1]).unwrap();
    assert_eq!(store.load().unwrap().notes.len(), 1);

    store.save(&[]).unwrap();
    assert!(store.load().unwrap().notes.is_empty());
}

#[test]
fn load_skips_malformed_line_and_reports_line_number() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let notes = sample_notes();
    let contents = format!(
        "{}\n{}\nbroken|only|four|2024-01-01T00:00:00\n{}\n",
        encode_record(&notes[0]),
        encode_record(&notes[1]),
        encode_record(&notes[2]),
    );
    fs::write(&config.notes_path, contents).unwrap();

    let report = FileNoteStore::new(config).load().unwrap();
    assert_eq!(report.notes, notes);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line_number, 3);
    assert_eq!(report.skipped[0].error, FormatError::FieldCount { found: 4 });
    assert_eq!(
        report.skipped[0].to_string(),
        "line 3: expected 5 fields, found 4"
    );
}

#[test]
fn save_into_unwritable_location_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let store = FileNoteStore::new(StoreConfig::new(
        blocker.join("notes.txt"),
        blocker.join("notes_backup.txt"),
    ));

    let err = store.save(&sample_notes()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn backup_restore_round_trip_yields_saved_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));
    let notes = sample_notes();

    store.save(&notes).unwrap();
    let backup = store.create_backup().unwrap();
    assert!(matches!(backup, CopyOutcome::Copied { bytes } if bytes > 0));

    store.save(&notes[..1]).unwrap();
    assert_eq!(store.restore_from_backup().unwrap(), backup);
    assert_eq!(store.load().unwrap().notes, notes);
}

#[test]
fn backup_is_byte_identical_copy() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let store = FileNoteStore::new(config.clone());

    fs::write(&config.notes_path, b"garbage line\n\n\xffraw bytes\n").unwrap();
    store.create_backup().unwrap();
    assert_eq!(
        fs::read(&config.backup_path).unwrap(),
        fs::read(&config.notes_path).unwrap()
    );
}

#[test]
fn backup_and_restore_report_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let store = FileNoteStore::new(config.clone());

    assert_eq!(store.create_backup().unwrap(), CopyOutcome::SourceMissing);
    assert!(!config.backup_path.exists());

    store.save(&sample_notes()).unwrap();
    assert_eq!(
        store.restore_from_backup().unwrap(),
        CopyOutcome::SourceMissing
    );
    assert_eq!(store.load().unwrap().notes.len(), 3);
}

#[test]
fn export_writes_readable_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));
    let export_path = dir.path().join("notes_export.txt");

    store.export_readable(&sample_notes(), &export_path).unwrap();
    let exported = fs::read_to_string(&export_path).unwrap();

    assert!(exported.starts_with("=== NOTES EXPORT ===\nExport Date: "));
    assert!(exported.contains("Total Notes: 3\n"));
    assert!(exported.contains("Note #1\n"));
    assert!(exported.contains("Note #3\n"));
    assert!(exported.contains("Title: Shopping List\nCategory: Personal\n"));
    assert!(exported.contains("Content:\nmilk\neggs | bread\n"));
    assert!(exported.contains("Category: General\n"));
}

#[test]
fn file_stats_reports_each_file_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));

    let before = store.file_stats().unwrap();
    assert!(!before.notes.exists);
    assert!(!before.backup.exists);
    assert_eq!(before.notes.size_bytes, 0);
    assert_eq!(before.notes.modified, None);

    store.save(&sample_notes()).unwrap();
    let after = store.file_stats().unwrap();
    let on_disk = fs::metadata(dir.path().join("notes.txt")).unwrap().len();
    assert!(after.notes.exists);
    assert_eq!(after.notes.size_bytes, on_disk);
    assert!(after.notes.modified.is_some());
    assert!(!after.backup.exists);
}

#[test]
fn leading_feff_in_first_title_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(StoreConfig::in_dir(dir.path()));
    let notes = vec![
        Note::new("\u{feff}Title", "c", None),
        Note::new("second", "\u{feff}body", None),
    ];

    store.save(&notes).unwrap();
    assert_eq!(store.load().unwrap().notes, notes);

    store.create_backup().unwrap();
    store.restore_from_backup().unwrap();
    assert_eq!(store.load().unwrap().notes, notes);
}

#[cfg(unix)]
#[test]
fn save_keeps_existing_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::in_dir(dir.path());
    let store = FileNoteStore::new(config.clone());

    store.save(&sample_notes()).unwrap();
    fs::set_permissions(&config.notes_path, fs::Permissions::from_mode(0o644)).unwrap();
    store.save(&sample_notes()[..1]).unwrap();

    let mode = fs::metadata(&config.notes_path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
    assert_eq!(store.load().unwrap().notes.len(), 1);
}

#[cfg(unix)]
#[test]
fn save_through_symlink_updates_link_target() {
    let dir = tempfile::tempdir().unwrap();
    let real = dir.path().join("real_notes.txt");
    fs::write(&real, "").unwrap();
    let link = dir.path().join("notes.txt");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let store = FileNoteStore::new(StoreConfig::new(&link, dir.path().join("backup.txt")));
    let notes = sample_notes();
    store.save(&notes).unwrap();

    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(fs::read_to_string(&real).unwrap().lines().count(), 3);
    assert_eq!(store.load().unwrap().notes, notes);
}

#[test]
fn backup_onto_notes_file_is_rejected_without_data_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    let store = FileNoteStore::new(StoreConfig::new(&path, &path));
    let notes = sample_notes();

    store.save(&notes).unwrap();
    let err = store.create_backup().unwrap_err();
    assert!(matches!(err, StoreError::SameFile { .. }));
    let err = store.restore_from_backup().unwrap_err();
    assert!(matches!(err, StoreError::SameFile { .. }));

    assert_eq!(store.load().unwrap().notes, notes);
}
