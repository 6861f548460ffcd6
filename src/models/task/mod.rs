// Task module
// A single time-boxed item in the schedule with an optional checklist

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MINUTE: u32 = 0;
pub const DEFAULT_DURATION_MINUTES: u32 = 60;
pub const MAX_HOUR: u32 = 23;
pub const MAX_MINUTE: u32 = 59;

/// Scheduled task owned by a [`Schedule`](crate::models::schedule::Schedule).
///
/// `subtasks_completed` always has the same length as `subtasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub date: NaiveDate,
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub subtasks: Vec<String>,
    #[serde(default)]
    pub subtasks_completed: Vec<bool>,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl Task {
    /// Build a task with a fresh, all-false checklist.
    pub fn new(
        id: u64,
        date: NaiveDate,
        text: impl Into<String>,
        hour: u32,
        minute: u32,
        duration: u32,
        subtasks: Vec<String>,
    ) -> Self {
        let subtasks_completed = vec![false; subtasks.len()];
        Self {
            id,
            text: text.into(),
            date,
            hour,
            minute,
            duration,
            subtasks,
            subtasks_completed,
        }
    }

    /// Replace the checklist. Completion state is reset, not carried over.
    pub fn replace_subtasks(&mut self, subtasks: Vec<String>) {
        self.subtasks_completed = vec![false; subtasks.len()];
        self.subtasks = subtasks;
    }

    /// Flip one checklist entry. Returns `false` when `index` is out of range.
    pub fn toggle_subtask(&mut self, index: usize) -> bool {
        match self.subtasks_completed.get_mut(index) {
            Some(done) => {
                *done = !*done;
                true
            }
            None => false,
        }
    }

    /// Re-establish the checklist length invariant after loading foreign data.
    pub fn normalize(&mut self) {
        self.subtasks_completed.resize(self.subtasks.len(), false);
    }

    pub fn start_minutes(&self) -> u32 {
        self.hour.saturating_mul(60).saturating_add(self.minute)
    }

    pub fn end_minutes(&self) -> u32 {
        self.start_minutes().saturating_add(self.duration)
    }

    pub fn completed_count(&self) -> usize {
        self.subtasks_completed.iter().filter(|done| **done).count()
    }

    /// Start time as "7:05 AM".
    pub fn time_label(&self) -> String {
        format_time(self.hour, self.minute)
    }

    /// Apply whichever fields are present in `changes`.
    pub fn apply_changes(&mut self, changes: &TaskChanges) {
        if let Some(ref text) = changes.text {
            self.text = text.clone();
        }
        if let Some(hour) = changes.hour {
            self.hour = hour;
        }
        if let Some(minute) = changes.minute {
            self.minute = minute;
        }
        if let Some(duration) = changes.duration {
            self.duration = duration;
        }
        if let Some(ref subtasks) = changes.subtasks {
            self.replace_subtasks(subtasks.clone());
        }
    }
}

fn check_hour(hour: u32) -> Result<(), String> {
    if hour > MAX_HOUR {
        return Err(format!("hour {} is outside 0-{}", hour, MAX_HOUR));
    }
    Ok(())
}

fn check_minute(minute: u32) -> Result<(), String> {
    if minute > MAX_MINUTE {
        return Err(format!("minute {} is outside 0-{}", minute, MAX_MINUTE));
    }
    Ok(())
}

fn check_duration(duration: u32) -> Result<(), String> {
    if duration == 0 {
        return Err("duration must be at least one minute".to_string());
    }
    Ok(())
}

/// 12-hour clock label used by listings.
pub fn format_time(hour: u32, minute: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<String>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.hour.is_none()
            && self.minute.is_none()
            && self.duration.is_none()
            && self.subtasks.is_none()
    }

    /// Check every field that is present against the task invariants.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(hour) = self.hour {
            check_hour(hour)?;
        }
        if let Some(minute) = self.minute {
            check_minute(minute)?;
        }
        if let Some(duration) = self.duration {
            check_duration(duration)?;
        }
        Ok(())
    }
}

/// Body of an `add` request before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub hour: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<String>>,
}

impl NewTask {
    pub fn new(text: impl Into<String>, hour: u32) -> Self {
        Self {
            text: text.into(),
            date: None,
            hour,
            minute: None,
            duration: None,
            subtasks: None,
        }
    }

    pub fn minute_or_default(&self) -> u32 {
        self.minute.unwrap_or(DEFAULT_MINUTE)
    }

    pub fn duration_or_default(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    pub fn validate(&self) -> Result<(), String> {
        check_hour(self.hour)?;
        check_minute(self.minute_or_default())?;
        check_duration(self.duration_or_default())
    }
}
