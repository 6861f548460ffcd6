//! Output formatting for CLI commands.
//!
//! Everything is printed either as pretty JSON (`--json`) or as plain text.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use skej::models::pattern::PatternCandidate;
use skej::models::schedule::Schedule;
use skej::models::task::Task;
use skej::services::placement::Relocation;
use skej::services::reconcile::ReconcileReport;
use skej::utils::date::{format_date_display, ViewRange};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_message(message: &str, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({ "message": message }));
    }
    println!("{}", message);
    Ok(())
}

/// Print every date of `range` with its tasks in insertion order.
pub fn print_range(schedule: &Schedule, range: &ViewRange, json: bool) -> Result<()> {
    if json {
        let days: Vec<_> = range
            .dates()
            .into_iter()
            .map(|date| json!({ "date": date, "tasks": schedule.tasks_for(date) }))
            .collect();
        return print_json(&json!({ "range": range.describe(), "days": days }));
    }

    println!("{}", range.describe());
    for date in range.dates() {
        let tasks = schedule.tasks_for(date);
        if range.is_week() {
            println!("\n{}", format_date_display(date));
        }
        if tasks.is_empty() {
            println!("  (no tasks)");
            continue;
        }
        for task in tasks {
            print_task_line(task);
        }
    }
    Ok(())
}

fn print_task_line(task: &Task) {
    let progress = if task.subtasks.is_empty() {
        String::new()
    } else {
        format!(" [{}/{}]", task.completed_count(), task.subtasks.len())
    };
    println!(
        "  #{:<4} {:>8}  {} ({} min){}",
        task.id,
        task.time_label(),
        task.text,
        task.duration,
        progress
    );
    for (index, (text, done)) in task
        .subtasks
        .iter()
        .zip(task.subtasks_completed.iter())
        .enumerate()
    {
        println!("          {} {}. {}", if *done { "[x]" } else { "[ ]" }, index, text);
    }
}

pub fn print_task(task: &Task, json: bool) -> Result<()> {
    if json {
        return print_json(task);
    }
    println!("{}", format_date_display(task.date));
    print_task_line(task);
    Ok(())
}

pub fn print_task_added(task: &Task, json: bool) -> Result<()> {
    if json {
        return print_json(task);
    }
    println!(
        "Added task {} on {} at {}",
        task.id,
        task.date,
        task.time_label()
    );
    Ok(())
}

pub fn print_relocation(relocation: &Relocation, json: bool) -> Result<()> {
    let task = &relocation.task;
    if json {
        return print_json(&json!({
            "task": task,
            "movedAcrossDates": relocation.moved_across_dates,
        }));
    }
    println!(
        "Moved task {} to {} at {}",
        task.id,
        task.date,
        task.time_label()
    );
    Ok(())
}

pub fn print_report(report: &ReconcileReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("{}", report.message);
    if report.summary.ignored > 0 {
        println!("({} operation(s) could not be applied)", report.summary.ignored);
    }
    Ok(())
}

pub fn print_patterns(patterns: &[PatternCandidate], json: bool) -> Result<()> {
    if json {
        return print_json(patterns);
    }
    if patterns.is_empty() {
        println!("No recurring tasks in the last two weeks.");
        return Ok(());
    }
    for pattern in patterns {
        println!(
            "{} on {}s around {}:00 ({} time(s))",
            pattern.text, pattern.day_of_week, pattern.representative_hour, pattern.occurrence_count
        );
    }
    Ok(())
}
