//! Command handlers for the skej CLI.
//!
//! Each invocation loads the session from the configured store, performs
//! one command and exits; the session saves after every change.

mod args;
mod output;

pub use args::{Args, Command, RangeArgs};

use std::fs;
use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};

use skej::models::settings::{DefaultView, Settings};
use skej::services::interpretation::{parse_response, HttpInterpreter};
use skej::services::pattern::{collect_history, extract_patterns};
use skej::services::placement::{DragSource, DragView, DropTarget};
use skej::services::session::ScheduleSession;
use skej::services::settings::{storage_path, SettingsService};
use skej::services::store::open_store;
use skej::utils::date::ViewRange;

pub fn run(args: Args) -> Result<()> {
    let settings_service = match &args.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_default_location(),
    };
    let settings = settings_service.get()?;
    let today = Local::now().date_naive();

    let store = open_store(settings.storage_backend, &storage_path(&settings))?;
    let range = initial_range(&args.command, &settings, today);
    let mut session = ScheduleSession::load(store, range)?;
    let json = args.json;

    match args.command {
        Command::List { .. } => {
            output::print_range(session.schedule(), &range, json)?;
        }
        Command::Add {
            text,
            hour,
            minute,
            duration,
            subtasks,
            date,
        } => {
            let date = date.unwrap_or(today);
            let task = session.add_task(date, text, hour, minute, duration, subtasks);
            output::print_task_added(&task, json)?;
        }
        Command::Move {
            id,
            from,
            to,
            hour,
            offset,
            week,
        } => {
            let view = if week { DragView::Week } else { DragView::Day };
            let relocation = session
                .relocate(
                    DragSource {
                        date: from,
                        task_id: id,
                    },
                    DropTarget::new(to, hour, offset, view),
                )
                .ok_or_else(|| anyhow!("No task {} on {}", id, from))?;
            output::print_relocation(&relocation, json)?;
        }
        Command::Delete { id, date } => {
            if session.delete_task(date, id) {
                output::print_message(&format!("Deleted task {} from {}", id, date), json)?;
            } else {
                log::warn!("Delete of unknown task {} on {}", id, date);
                output::print_message(&format!("No task {} on {}; nothing deleted", id, date), json)?;
            }
        }
        Command::Done { id, index, date } => {
            if !session.toggle_subtask(date, id, index) {
                bail!("No checklist item {} on task {} ({})", index, id, date);
            }
            let task = session
                .schedule()
                .find(date, id)
                .ok_or_else(|| anyhow!("No task {} on {}", id, date))?;
            output::print_task(task, json)?;
        }
        Command::Apply { file, .. } => {
            let body = read_input(&file)?;
            let batch = parse_response(&body).with_context(|| format!("Invalid batch in {}", file))?;
            let report = session.apply_batch(batch);
            output::print_report(&report, json)?;
        }
        Command::Ask { text, .. } => {
            let interpreter = HttpInterpreter::from_settings(&settings)?;
            let report = session.request(&interpreter, &text, today)?;
            output::print_report(&report, json)?;
        }
        Command::Patterns { .. } => {
            let history = collect_history(session.schedule(), &range, today);
            output::print_patterns(&extract_patterns(&history), json)?;
        }
        Command::Context { text } => match text {
            Some(text) => {
                session.set_context(text);
                output::print_message("Context updated", json)?;
            }
            None => output::print_message(session.context_text(), json)?,
        },
        Command::Clear { .. } => {
            let removed = session.clear_range();
            output::print_message(
                &format!("Cleared {} task(s) from {}", removed, range.describe()),
                json,
            )?;
        }
    }

    Ok(())
}

fn initial_range(command: &Command, settings: &Settings, today: NaiveDate) -> ViewRange {
    match command {
        Command::List { range }
        | Command::Apply { range, .. }
        | Command::Ask { range, .. }
        | Command::Patterns { range }
        | Command::Clear { range } => resolve_range(range, settings, today),
        _ => ViewRange::day(today),
    }
}

/// `--week` or a week default view selects the week containing the date.
fn resolve_range(args: &RangeArgs, settings: &Settings, today: NaiveDate) -> ViewRange {
    let date = args.date.unwrap_or(today);
    if args.week || settings.default_view == DefaultView::Week {
        ViewRange::week_of(date)
    } else {
        ViewRange::day(date)
    }
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read batch from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(file).with_context(|| format!("Failed to read batch from {}", file))
}
