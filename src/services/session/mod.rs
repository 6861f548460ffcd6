//! The single writer for a schedule.
//!
//! [`ScheduleSession`] owns the [`Schedule`], the free-text user context and
//! the range being edited. Every change goes through `&mut self` and is
//! followed by a full snapshot to the [`ScheduleStore`]. A failed save is
//! logged; the in-memory schedule keeps the change.

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::operation::OperationBatch;
use crate::models::schedule::{PersistedState, Schedule};
use crate::models::task::{Task, TaskChanges};
use crate::services::interpretation::{
    build_request, parse_response, InterpretError, InterpretRequest, Interpreter,
};
use crate::services::placement::{relocate, DragSource, DropTarget, Relocation};
use crate::services::reconcile::{OperationReconciler, ReconcileReport};
use crate::services::store::ScheduleStore;
use crate::services::task::TaskService;
use crate::utils::date::ViewRange;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("an interpretation request is already in progress")]
    RequestInFlight,

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

pub struct ScheduleSession {
    schedule: Schedule,
    context_text: String,
    store: Box<dyn ScheduleStore>,
    range: ViewRange,
    busy: bool,
}

impl ScheduleSession {
    /// Restore the stored state and start editing `range`.
    pub fn load(store: Box<dyn ScheduleStore>, range: ViewRange) -> Result<Self> {
        let state = store.load().context("Failed to load schedule")?;
        let (schedule, context_text) = state.restore();
        log::info!(
            "Loaded {} task(s) across {} date(s)",
            schedule.task_count(),
            schedule.dates().count()
        );

        Ok(Self {
            schedule,
            context_text,
            store,
            range,
            busy: false,
        })
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn context_text(&self) -> &str {
        &self.context_text
    }

    pub fn range(&self) -> ViewRange {
        self.range
    }

    pub fn set_range(&mut self, range: ViewRange) {
        self.range = range;
    }

    /// True while an interpretation request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn set_context(&mut self, text: impl Into<String>) {
        self.context_text = text.into();
        self.persist();
    }

    pub fn add_task(
        &mut self,
        date: NaiveDate,
        text: impl Into<String>,
        hour: u32,
        minute: u32,
        duration: u32,
        subtasks: Vec<String>,
    ) -> Task {
        let task = TaskService::new(&mut self.schedule)
            .add_task(date, text, hour, minute, duration, subtasks);
        self.persist();
        task
    }

    pub fn update_task(&mut self, date: NaiveDate, id: u64, changes: &TaskChanges) -> Option<Task> {
        let task = TaskService::new(&mut self.schedule).update_task(date, id, changes)?;
        self.persist();
        Some(task)
    }

    pub fn delete_task(&mut self, date: NaiveDate, id: u64) -> bool {
        let removed = TaskService::new(&mut self.schedule).delete_task(date, id);
        if removed {
            self.persist();
        }
        removed
    }

    pub fn toggle_subtask(&mut self, date: NaiveDate, id: u64, index: usize) -> bool {
        let toggled = TaskService::new(&mut self.schedule).toggle_subtask(date, id, index);
        if toggled {
            self.persist();
        }
        toggled
    }

    /// Remove every task in the current range.
    pub fn clear_range(&mut self) -> usize {
        let range = self.range;
        let removed = TaskService::new(&mut self.schedule).clear_range(&range);
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Apply a drag-and-drop move.
    pub fn relocate(&mut self, source: DragSource, target: DropTarget) -> Option<Relocation> {
        let relocation = relocate(&mut self.schedule, source, target)?;
        self.persist();
        Some(relocation)
    }

    /// Reconcile `batch` against the current range.
    pub fn apply_batch(&mut self, batch: OperationBatch) -> ReconcileReport {
        let range = self.range;
        let report = OperationReconciler::new(&mut self.schedule).apply(batch, &range);
        if report.summary.changed() {
            self.persist();
        }
        report
    }

    /// Start an interpretation request for `text`.
    ///
    /// Marks the session busy until [`ScheduleSession::complete_request`]
    /// is called. Fails with [`SessionError::RequestInFlight`] if a request
    /// is already outstanding.
    pub fn begin_request(&mut self, text: &str, today: NaiveDate) -> Result<InterpretRequest, SessionError> {
        if self.busy {
            return Err(SessionError::RequestInFlight);
        }
        self.busy = true;
        Ok(build_request(
            &self.schedule,
            &self.range,
            &self.context_text,
            text,
            today,
        ))
    }

    /// Finish the outstanding request with the interpreter's response.
    ///
    /// Transport and parse failures leave the schedule untouched.
    pub fn complete_request(
        &mut self,
        response: Result<String, InterpretError>,
    ) -> Result<ReconcileReport, SessionError> {
        self.busy = false;
        let body = response?;
        let batch = parse_response(&body)?;
        Ok(self.apply_batch(batch))
    }

    /// Send `text` through `interpreter` and apply the resulting batch.
    pub fn request(
        &mut self,
        interpreter: &dyn Interpreter,
        text: &str,
        today: NaiveDate,
    ) -> Result<ReconcileReport, SessionError> {
        let request = self.begin_request(text, today)?;
        let response = interpreter.interpret(&request);
        if let Err(ref err) = response {
            log::warn!("Interpretation failed: {}", err);
        }
        self.complete_request(response)
    }

    /// Write a full snapshot. Failures are logged, never propagated.
    fn persist(&self) {
        let state = PersistedState::capture(&self.schedule, &self.context_text);
        if let Err(err) = self.store.save(&state) {
            log::error!("Failed to save schedule: {:#}", err);
        }
    }
}
