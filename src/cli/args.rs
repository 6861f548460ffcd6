use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// skej: a per-date task planner driven by natural language
#[derive(Parser, Debug)]
#[command(name = "skej")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Selects the day or week being worked on.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct RangeArgs {
    /// Date to work on (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Use the Sunday-to-Saturday week containing the date
    #[arg(short, long)]
    pub week: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the tasks of a day or week
    List {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Add a task
    Add {
        /// Task description
        text: String,
        /// Start hour (0-23)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour: u32,
        /// Start minute (0-59)
        #[arg(long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=59))]
        minute: u32,
        /// Duration in minutes
        #[arg(long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,
        /// Checklist item (repeatable)
        #[arg(short, long = "subtask")]
        subtasks: Vec<String>,
        /// Date of the task (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Move a task as if dragged to a new slot
    Move {
        /// Task ID
        id: u64,
        /// Date the task is on now
        #[arg(long)]
        from: NaiveDate,
        /// Date to drop it on
        #[arg(long)]
        to: NaiveDate,
        /// Hour slot to drop it in (0-23)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
        hour: u32,
        /// Vertical drop offset in pixels from the top of the slot
        #[arg(long, default_value = "0")]
        offset: f32,
        /// Use week-view slot height
        #[arg(short, long)]
        week: bool,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: u64,
        /// Date the task is on
        #[arg(long)]
        date: NaiveDate,
    },
    /// Toggle a checklist item
    Done {
        /// Task ID
        id: u64,
        /// Zero-based checklist index
        index: usize,
        /// Date the task is on
        #[arg(long)]
        date: NaiveDate,
    },
    /// Apply an operation batch from a file ("-" for stdin)
    Apply {
        /// Batch file
        file: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Ask the interpretation service to edit the schedule
    Ask {
        /// What to change, in plain words
        text: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show recurring tasks found in the last two weeks
    Patterns {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Show or set the personal context sent with requests
    Context {
        /// New context text (omit to show the current one)
        text: Option<String>,
    },
    /// Delete every task of a day or week
    Clear {
        #[command(flatten)]
        range: RangeArgs,
    },
}
