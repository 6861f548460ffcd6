use super::TaskService;
use crate::models::task::{Task, TaskChanges};
use chrono::NaiveDate;

impl<'a> TaskService<'a> {
    /// Append a new task to `date`'s bucket and return a copy of it.
    pub fn add_task(
        &mut self,
        date: NaiveDate,
        text: impl Into<String>,
        hour: u32,
        minute: u32,
        duration: u32,
        subtasks: Vec<String>,
    ) -> Task {
        let id = self.schedule.allocate_id();
        let task = Task::new(id, date, text, hour, minute, duration, subtasks);
        self.schedule.bucket_or_insert(date).push(task.clone());
        log::debug!("Added task {} on {}", id, date);
        task
    }

    /// Apply `changes` to the task `id` in `date`'s bucket.
    ///
    /// Returns `None` without touching anything when the task is not in
    /// that bucket.
    pub fn update_task(&mut self, date: NaiveDate, id: u64, changes: &TaskChanges) -> Option<Task> {
        let task = self.schedule.find_mut(date, id)?;
        task.apply_changes(changes);
        Some(task.clone())
    }

    /// Remove the task `id` from `date`'s bucket. Returns whether anything
    /// was removed; removing an absent task is a no-op.
    pub fn delete_task(&mut self, date: NaiveDate, id: u64) -> bool {
        let Some(tasks) = self.schedule.bucket_mut(date) else {
            return false;
        };
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        before != tasks.len()
    }

    /// Reposition a task, moving it between buckets when the date changes.
    ///
    /// The task keeps its id and checklist. A cross-date move appends it to
    /// the end of the target bucket.
    pub fn move_task(
        &mut self,
        source: NaiveDate,
        id: u64,
        target: NaiveDate,
        hour: u32,
        minute: u32,
    ) -> Option<Task> {
        if source == target {
            let task = self.schedule.find_mut(source, id)?;
            task.hour = hour;
            task.minute = minute;
            return Some(task.clone());
        }

        let tasks = self.schedule.bucket_mut(source)?;
        let index = tasks.iter().position(|task| task.id == id)?;
        let mut task = tasks.remove(index);
        task.hour = hour;
        task.minute = minute;
        task.date = target;

        let moved = task.clone();
        self.schedule.bucket_or_insert(target).push(task);
        log::debug!("Moved task {} from {} to {}", id, source, target);
        Some(moved)
    }

    /// Flip one checklist entry of a task.
    pub fn toggle_subtask(&mut self, date: NaiveDate, id: u64, index: usize) -> bool {
        self.schedule
            .find_mut(date, id)
            .map(|task| task.toggle_subtask(index))
            .unwrap_or(false)
    }
}
