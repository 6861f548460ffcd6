//! Batch reconciliation.
//!
//! Applies the operations produced by the interpretation service to a
//! [`Schedule`] in batch order. Problems with a single operation (an unknown
//! id, an unrecognised shape, an out-of-range time) are counted and skipped;
//! they never stop the rest of the batch.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::operation::{BatchEntry, BatchKind, Operation, OperationBatch};
use crate::models::schedule::Schedule;
use crate::models::task::Task;
use crate::services::task::TaskService;
use crate::utils::date::ViewRange;

/// Per-kind counts for one reconciled batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileSummary {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub ignored: usize,
}

impl ReconcileSummary {
    /// True when at least one operation changed the schedule.
    pub fn changed(&self) -> bool {
        self.added + self.updated + self.deleted > 0
    }

    pub fn message(&self) -> String {
        let mut message = format!(
            "Done: {} added, {} updated, {} deleted",
            self.added, self.updated, self.deleted
        );
        if self.ignored > 0 {
            message.push_str(&format!(", {} ignored", self.ignored));
        }
        message
    }

    fn record(&mut self, outcome: &OperationOutcome) {
        match outcome {
            OperationOutcome::Added(_) => self.added += 1,
            OperationOutcome::Updated(_) => self.updated += 1,
            OperationOutcome::Deleted { .. } => self.deleted += 1,
            OperationOutcome::Ignored(_) => self.ignored += 1,
        }
    }
}

/// What happened to a single operation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    Added(Task),
    Updated(Task),
    Deleted { date: NaiveDate, id: u64 },
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The entry did not match any known operation shape, or carried a
    /// field outside the task's allowed range.
    Malformed(String),
    /// No task with this id in the resolved date's bucket.
    NotFound { date: NaiveDate, id: u64 },
}

/// Result of reconciling a batch: counts plus the status line to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub summary: ReconcileSummary,
    pub message: String,
}

pub struct OperationReconciler<'a> {
    tasks: TaskService<'a>,
}

impl<'a> OperationReconciler<'a> {
    pub fn new(schedule: &'a mut Schedule) -> Self {
        Self {
            tasks: TaskService::new(schedule),
        }
    }

    /// Apply every entry of `batch` in order.
    ///
    /// Operations without an explicit date land on `range`'s default
    /// target: the day itself, or the first day of the week.
    pub fn apply(&mut self, batch: OperationBatch, range: &ViewRange) -> ReconcileReport {
        let fallback = range.default_target();
        let mut summary = ReconcileSummary::default();

        for (index, entry) in batch.entries.into_iter().enumerate() {
            let outcome = match entry {
                BatchEntry::Valid(op) => self.apply_operation(op, fallback),
                BatchEntry::Invalid { reason, .. } => {
                    OperationOutcome::Ignored(IgnoreReason::Malformed(reason))
                }
            };
            if let OperationOutcome::Ignored(ref reason) = outcome {
                log::debug!("Skipping operation #{}: {:?}", index, reason);
            }
            summary.record(&outcome);
        }

        log::info!(
            "Reconciled batch: {} added, {} updated, {} deleted, {} ignored",
            summary.added,
            summary.updated,
            summary.deleted,
            summary.ignored
        );

        let message = match (batch.message, batch.kind) {
            (Some(message), _) => message,
            (None, BatchKind::Tasks) => format!("Added {} task(s)", summary.added),
            (None, _) => summary.message(),
        };

        ReconcileReport { summary, message }
    }

    /// Apply one operation against its resolved date.
    pub fn apply_operation(&mut self, op: Operation, fallback: NaiveDate) -> OperationOutcome {
        let date = op.target_date(fallback);
        match op {
            Operation::Add { task, .. } => {
                if let Err(reason) = task.validate() {
                    return OperationOutcome::Ignored(IgnoreReason::Malformed(reason));
                }
                let minute = task.minute_or_default();
                let duration = task.duration_or_default();
                let added = self.tasks.add_task(
                    date,
                    task.text,
                    task.hour,
                    minute,
                    duration,
                    task.subtasks.unwrap_or_default(),
                );
                OperationOutcome::Added(added)
            }
            Operation::Update { id, changes, .. } => {
                if let Err(reason) = changes.validate() {
                    return OperationOutcome::Ignored(IgnoreReason::Malformed(reason));
                }
                match self.tasks.update_task(date, id, &changes) {
                    Some(task) => OperationOutcome::Updated(task),
                    None => OperationOutcome::Ignored(IgnoreReason::NotFound { date, id }),
                }
            }
            Operation::Delete { id, .. } => {
                if self.tasks.delete_task(date, id) {
                    OperationOutcome::Deleted { date, id }
                } else {
                    OperationOutcome::Ignored(IgnoreReason::NotFound { date, id })
                }
            }
        }
    }
}
