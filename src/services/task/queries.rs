use super::TaskService;
use crate::models::task::Task;
use crate::utils::date::ViewRange;
use chrono::NaiveDate;

impl<'a> TaskService<'a> {
    /// Tasks for `date`, empty when the date has none.
    pub fn tasks_for(&self, date: NaiveDate) -> &[Task] {
        self.schedule.tasks_for(date)
    }

    pub fn find_task(&self, date: NaiveDate, id: u64) -> Option<&Task> {
        self.schedule.find(date, id)
    }

    /// Tasks shown by `range`, grouped per date in ascending date order.
    pub fn tasks_in_range(&self, range: &ViewRange) -> Vec<(NaiveDate, &[Task])> {
        range
            .dates()
            .into_iter()
            .map(|date| (date, self.schedule.tasks_for(date)))
            .collect()
    }

    /// Remove every task shown by `range`. Returns the number removed.
    pub fn clear_range(&mut self, range: &ViewRange) -> usize {
        let removed = self.schedule.clear_dates(&range.dates());
        if removed > 0 {
            log::info!("Cleared {} task(s) from {}", removed, range.describe());
        }
        removed
    }
}
