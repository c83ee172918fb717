//! Command front-end for the flat-file note store.
//!
//! # Responsibility
//! - Map command-line arguments onto `flatnote_core` use-cases.
//! - Render results and failures as plain text; never panic on user input.
//!
//! # Invariants
//! - Every mutation goes through `NoteService`, which saves after it.
//! - Note numbers are 1-based, matching `list` output.

use clap::{Parser, Subcommand};
use flatnote_core::{
    core_version, default_log_level, init_logging, CopyOutcome, FileInfo, FileNoteStore, Note,
    NoteEdit, NoteService, NoteServiceError, SkippedLine, StoreConfig, DEFAULT_BACKUP_FILE,
    DEFAULT_EXPORT_FILE, DEFAULT_NOTES_FILE,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser, Debug)]
#[command(name = "flatnote", version, about = "Short text notes kept in a flat file")]
struct Cli {
    /// Notes file, one encoded note per line.
    #[arg(long, env = "FLATNOTE_NOTES_FILE", default_value = DEFAULT_NOTES_FILE, global = true)]
    notes_file: PathBuf,

    /// Backup file used by `backup` and `restore`.
    #[arg(long, env = "FLATNOTE_BACKUP_FILE", default_value = DEFAULT_BACKUP_FILE, global = true)]
    backup_file: PathBuf,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "FLATNOTE_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "FLATNOTE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a note.
    Add {
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Defaults to "General".
        #[arg(long)]
        category: Option<String>,
    },
    /// List all notes.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Case-insensitive search over title, content and category.
    Search { query: String },
    /// List notes grouped by category.
    Categories,
    /// Edit a note by number; only given fields change.
    Edit {
        number: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a note by number.
    Delete { number: usize },
    /// Write a readable export.
    Export {
        #[arg(default_value = DEFAULT_EXPORT_FILE)]
        file: PathBuf,
    },
    /// Collection statistics and file state.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Copy the notes file to the backup file.
    Backup,
    /// Copy the backup file over the notes file.
    Restore,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Version = cli.command {
        println!("flatnote_core version={}", core_version());
        return Ok(());
    }

    let store = FileNoteStore::new(StoreConfig::new(cli.notes_file, cli.backup_file));
    let (mut service, skipped) = NoteService::open(store).map_err(describe)?;
    report_skipped(&skipped);
    info!(
        "event=cli_command module=cli status=start notes={}",
        service.notes().len()
    );

    match cli.command {
        Command::Add {
            title,
            content,
            category,
        } => {
            if title.trim().is_empty() {
                return Err("title cannot be empty".to_string());
            }
            let note = service
                .add_note(title, content, category.as_deref())
                .map_err(describe)?;
            println!("Added '{}' [{}]", note.title, note.category);
        }
        Command::List { json } => {
            if json {
                let rendered = serde_json::to_string_pretty(service.notes().as_slice())
                    .map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else if service.notes().is_empty() {
                println!("No notes yet.");
            } else {
                for (index, note) in service.notes().iter().enumerate() {
                    print_note(index, note);
                }
            }
        }
        Command::Search { query } => {
            if query.trim().is_empty() {
                return Err("search query cannot be empty".to_string());
            }
            let hits = service.notes().search(&query);
            if hits.is_empty() {
                println!("No notes match '{query}'.");
            }
            for hit in hits {
                print_note(hit.index, hit.note);
            }
        }
        Command::Categories => {
            for (category, notes) in service.notes().group_by_category() {
                println!("{category} ({})", notes.len());
                for note in notes {
                    println!("  - {}", note.title);
                }
            }
        }
        Command::Edit {
            number,
            title,
            content,
            category,
        } => {
            let index = to_index(number)?;
            let edits: Vec<NoteEdit> = [
                title.map(NoteEdit::Title),
                content.map(NoteEdit::Content),
                category.map(NoteEdit::Category),
            ]
            .into_iter()
            .flatten()
            .collect();
            if edits.is_empty() {
                return Err("nothing to edit; pass --title, --content or --category".to_string());
            }
            for edit in edits {
                service.edit_note(index, edit).map_err(describe)?;
            }
            println!("Updated note #{number}");
        }
        Command::Delete { number } => {
            let removed = service.delete_note(to_index(number)?).map_err(describe)?;
            println!("Deleted '{}'", removed.title);
        }
        Command::Export { file } => {
            service.export(&file).map_err(describe)?;
            println!(
                "Exported {} notes to {}",
                service.notes().len(),
                file.display()
            );
        }
        Command::Stats { json } => {
            let stats = service.notes().statistics();
            let files = service.file_stats().map_err(describe)?;
            if json {
                let value = serde_json::json!({ "notes": stats, "files": files });
                let rendered =
                    serde_json::to_string_pretty(&value).map_err(|err| err.to_string())?;
                println!("{rendered}");
            } else {
                println!("Total notes: {}", stats.total_notes);
                println!("Categories: {}", stats.category_counts.len());
                for (category, count) in &stats.category_counts {
                    println!("  {category}: {count} notes");
                }
                println!("Total words: {}", stats.total_words);
                println!("Total characters: {}", stats.total_characters);
                if let Some(average) = stats.average_words_per_note {
                    println!("Average words per note: {average}");
                }
                print_file_info("Notes file", &files.notes);
                print_file_info("Backup file", &files.backup);
            }
        }
        Command::Backup => match service.create_backup().map_err(describe)? {
            CopyOutcome::Copied { bytes } => println!("Backup created ({bytes} bytes)"),
            CopyOutcome::SourceMissing => println!("No notes file to back up."),
        },
        Command::Restore => {
            let (outcome, skipped) = service.restore_from_backup().map_err(describe)?;
            report_skipped(&skipped);
            match outcome {
                CopyOutcome::Copied { .. } => println!(
                    "Restored {} notes from backup",
                    service.notes().len()
                ),
                CopyOutcome::SourceMissing => println!("No backup file found."),
            }
        }
        Command::Version => {}
    }

    Ok(())
}

fn to_index(number: usize) -> Result<usize, String> {
    number
        .checked_sub(1)
        .ok_or_else(|| "note numbers start at 1".to_string())
}

fn describe(err: NoteServiceError) -> String {
    err.to_string()
}

fn report_skipped(skipped: &[SkippedLine]) {
    for line in skipped {
        eprintln!("warning: skipped malformed record at {line}");
    }
}

fn print_note(index: usize, note: &Note) {
    println!("#{} [{}] {}", index + 1, note.category, note.title);
    println!(
        "    Created: {} | Modified: {}",
        note.created_at.format(DISPLAY_FORMAT),
        note.last_modified.format(DISPLAY_FORMAT)
    );
    for line in note.content.lines() {
        println!("    {line}");
    }
}

fn print_file_info(label: &str, info: &FileInfo) {
    if !info.exists {
        println!("{label}: not found");
        return;
    }
    match info.modified {
        Some(modified) => println!(
            "{label}: {} ({} bytes, modified {})",
            info.path.display(),
            info.size_bytes,
            modified.format(DISPLAY_FORMAT)
        ),
        None => println!(
            "{label}: {} ({} bytes)",
            info.path.display(),
            info.size_bytes
        ),
    }
}
