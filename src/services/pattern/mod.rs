//! Recurring-task detection.
//!
//! Groups recent task occurrences by `(text, weekday)` to give the
//! interpretation service hints such as "School usually happens on Monday
//! at 9". Nothing here mutates the schedule.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::pattern::{HistoricalTask, PatternCandidate, RangeTask};
use crate::models::schedule::Schedule;
use crate::utils::date::{weekday_name, ViewRange};

/// Days of history considered when collecting pattern input.
pub const HISTORY_WINDOW_DAYS: i64 = 14;

/// Group `history` by `(text, day_of_week)`.
///
/// Every group becomes a candidate, however few occurrences it has. The
/// representative hour is the hour of the last record seen for the group,
/// so callers should pass records oldest first. Candidates are returned in
/// the order their groups first appear.
pub fn extract_patterns(history: &[HistoricalTask]) -> Vec<PatternCandidate> {
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut candidates: Vec<PatternCandidate> = Vec::new();

    for record in history {
        let key = (record.text.as_str(), record.day_of_week.as_str());
        match index.get(&key) {
            Some(&slot) => {
                let candidate = &mut candidates[slot];
                candidate.occurrence_count += 1;
                candidate.representative_hour = record.hour;
            }
            None => {
                index.insert(key, candidates.len());
                candidates.push(PatternCandidate {
                    text: record.text.clone(),
                    day_of_week: record.day_of_week.clone(),
                    representative_hour: record.hour,
                    occurrence_count: 1,
                });
            }
        }
    }

    candidates
}

/// Task occurrences from `[today - 14 days, today)` that fall outside the
/// range currently being edited, oldest date first.
pub fn collect_history(schedule: &Schedule, range: &ViewRange, today: NaiveDate) -> Vec<HistoricalTask> {
    let window_start = today - Duration::days(HISTORY_WINDOW_DAYS);

    schedule
        .dates()
        .filter(|date| *date >= window_start && *date < today && !range.contains(*date))
        .flat_map(move |date| {
            let day_of_week = weekday_name(date);
            schedule
                .tasks_for(date)
                .iter()
                .map(move |task| HistoricalTask {
                    date,
                    day_of_week: day_of_week.clone(),
                    text: task.text.clone(),
                    hour: task.hour,
                    duration: task.duration,
                })
        })
        .collect()
}

/// Snapshot of the tasks in `range`, used by the interpreter to refer to
/// existing ids.
pub fn collect_current(schedule: &Schedule, range: &ViewRange) -> Vec<RangeTask> {
    range
        .dates()
        .into_iter()
        .flat_map(move |date| {
            let day_name = weekday_name(date);
            schedule.tasks_for(date).iter().map(move |task| RangeTask {
                id: task.id,
                date,
                day_name: day_name.clone(),
                text: task.text.clone(),
                hour: task.hour,
                minute: task.minute,
                duration: task.duration,
            })
        })
        .collect()
}
