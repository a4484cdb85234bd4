use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{DiaryEntry, Todo};
use crate::utils::{parse_date, today};

#[derive(Parser)]
#[command(name = "mydaily")]
#[command(about = "Daily diary and kanban task board for the terminal")]
#[command(version)]
pub struct Cli {
    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Quickly add a todo to the board
    Add {
        /// Todo title
        title: String,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// Write or overwrite the diary entry for a date
    Journal {
        /// Entry content
        content: String,
        /// Entry date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

/// Handle the add command
pub fn handle_add(
    title: String,
    description: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    if title.trim().is_empty() {
        return Err(CliError::EmptyInput("Title"));
    }

    let mut todo = Todo::new(title);
    todo.description = description;

    let id = db.insert_todo(&todo)?;
    println!("Todo created successfully (ID: {})", id);

    Ok(())
}

/// Handle the journal command. One entry per date: an existing entry is
/// updated in place, never duplicated.
pub fn handle_journal(
    content: String,
    date: Option<String>,
    db: &Database,
) -> Result<(), CliError> {
    if content.trim().is_empty() {
        return Err(CliError::EmptyInput("Content"));
    }

    let date = match date {
        Some(date_str) => {
            let parsed = parse_date(&date_str).map_err(|e| {
                CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e))
            })?;
            // Re-render canonically: chrono accepts loose input like
            // 2024-3-15, but entries are keyed on the zero-padded form
            parsed.format("%Y-%m-%d").to_string()
        }
        None => today().format("%Y-%m-%d").to_string(),
    };

    match db.get_entry_by_date(&date)? {
        Some(existing) => {
            let id = existing.id.ok_or(DatabaseError::MissingId)?;
            db.update_entry_content(id, &content)?;
            println!("Diary entry for {} updated", date);
        }
        None => {
            let entry = DiaryEntry::new(date.clone(), content);
            db.insert_entry(&entry)?;
            println!("Diary entry for {} created", date);
        }
    }

    Ok(())
}
