//! Task service entry point.
//! Mutations and range queries over an in-memory [`Schedule`], organized
//! across focused submodules.

use crate::models::schedule::Schedule;

pub mod crud;
pub mod queries;

/// Service for editing the tasks held by a [`Schedule`].
///
/// Every lookup is keyed by `(date, id)`; a task is never searched for in
/// a bucket other than the one named.
pub struct TaskService<'a> {
    pub(crate) schedule: &'a mut Schedule,
}

impl<'a> TaskService<'a> {
    /// Create a new TaskService over a schedule
    pub fn new(schedule: &'a mut Schedule) -> Self {
        Self { schedule }
    }
}
