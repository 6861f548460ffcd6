// Schedule module
// Date-bucketed task collections plus the id counter

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::task::Task;

/// Tasks keyed by calendar date, each bucket in insertion order.
pub type TaskBuckets = BTreeMap<NaiveDate, Vec<Task>>;

/// The aggregate that owns every task and issues ids.
///
/// Ids come from a monotonically increasing counter and are never reused,
/// even after the task carrying one has been deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    buckets: TaskBuckets,
    counter: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a schedule from persisted parts.
    ///
    /// Each task's `date` is forced to match its bucket, checklists are
    /// padded or truncated to the subtask count, and the counter is raised
    /// past the largest stored id so ids stay unique. An id that appears more
    /// than once keeps its first occurrence (in date order); later copies
    /// get fresh ids from the counter.
    pub fn from_parts(mut buckets: TaskBuckets, counter: u64) -> Self {
        let mut max_id: Option<u64> = None;
        for (date, tasks) in buckets.iter_mut() {
            for task in tasks.iter_mut() {
                task.date = *date;
                task.normalize();
                max_id = Some(max_id.map_or(task.id, |m| m.max(task.id)));
            }
        }

        let mut counter = match max_id {
            Some(max) if counter <= max => {
                log::warn!(
                    "Stored task counter {} is not above highest id {}; advancing",
                    counter,
                    max
                );
                max.saturating_add(1)
            }
            _ => counter,
        };

        let mut seen = HashSet::new();
        for (date, tasks) in buckets.iter_mut() {
            for task in tasks.iter_mut() {
                if !seen.insert(task.id) {
                    log::warn!(
                        "Task id {} on {} is already in use; renumbering to {}",
                        task.id,
                        date,
                        counter
                    );
                    task.id = counter;
                    seen.insert(counter);
                    counter = counter.saturating_add(1);
                }
            }
        }

        Self { buckets, counter }
    }

    pub fn into_parts(self) -> (TaskBuckets, u64) {
        (self.buckets, self.counter)
    }

    pub fn buckets(&self) -> &TaskBuckets {
        &self.buckets
    }

    /// The id the next added task will receive.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Hand out the next id and advance the counter.
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.counter;
        self.counter += 1;
        id
    }

    /// Tasks for `date` in insertion order; empty when the date has none.
    pub fn tasks_for(&self, date: NaiveDate) -> &[Task] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn bucket_mut(&mut self, date: NaiveDate) -> Option<&mut Vec<Task>> {
        self.buckets.get_mut(&date)
    }

    pub(crate) fn bucket_or_insert(&mut self, date: NaiveDate) -> &mut Vec<Task> {
        self.buckets.entry(date).or_default()
    }

    pub fn find(&self, date: NaiveDate, id: u64) -> Option<&Task> {
        self.tasks_for(date).iter().find(|task| task.id == id)
    }

    pub(crate) fn find_mut(&mut self, date: NaiveDate, id: u64) -> Option<&mut Task> {
        self.buckets
            .get_mut(&date)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == id))
    }

    /// Dates that have a bucket, ascending. Buckets may be empty.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.keys().copied()
    }

    /// Every task, ordered by date and then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.buckets.values().flatten()
    }

    pub fn task_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Empty the buckets for `dates`. The counter is left alone.
    pub fn clear_dates(&mut self, dates: &[NaiveDate]) -> usize {
        let mut removed = 0;
        for date in dates {
            if let Some(tasks) = self.buckets.get_mut(date) {
                removed += tasks.len();
                tasks.clear();
            }
        }
        removed
    }
}

/// Everything the persistence layer loads at startup and writes after
/// each mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub schedule: TaskBuckets,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub context_text: String,
}

impl PersistedState {
    pub fn capture(schedule: &Schedule, context_text: &str) -> Self {
        Self {
            schedule: schedule.buckets().clone(),
            counter: schedule.counter(),
            context_text: context_text.to_string(),
        }
    }

    /// Split into a live schedule and the user context text.
    pub fn restore(self) -> (Schedule, String) {
        (Schedule::from_parts(self.schedule, self.counter), self.context_text)
    }
}
