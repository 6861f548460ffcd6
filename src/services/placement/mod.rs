//! Drag repositioning.
//!
//! Converts a drop position inside an hour slot into a quarter-hour start
//! time and relocates the dragged task. The geometry is pure and has no
//! knowledge of any rendering surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::schedule::Schedule;
use crate::models::task::Task;
use crate::services::task::TaskService;

/// Pixel height of one hour in the day view.
pub const DAY_SLOT_HEIGHT: f32 = 60.0;
/// Pixel height of one hour in the week view.
pub const WEEK_SLOT_HEIGHT: f32 = 40.0;
/// Drag results snap to this many minutes.
pub const SNAP_MINUTES: u32 = 15;
/// Latest snapped minute; a drop never rolls into the next hour.
pub const MAX_SNAPPED_MINUTE: u32 = 45;
/// Shortest rendered task block, in pixels.
pub const MIN_TASK_HEIGHT: f32 = 16.0;

/// Minute within the hour for a drop `relative_y` pixels below the top of
/// a slot that is `slot_height_px` tall.
///
/// The raw minute is floored, then rounded half away from zero to the
/// nearest quarter hour and clamped to `0..=45`. A drop near the bottom of
/// the slot therefore stays in the slot's hour.
pub fn snap_minute(relative_y: f32, slot_height_px: f32) -> u32 {
    if !relative_y.is_finite() || !slot_height_px.is_finite() || slot_height_px <= 0.0 {
        return 0;
    }

    // Multiplying first keeps whole-pixel drops exact in floating point.
    let raw_minute = (f64::from(relative_y) * 60.0 / f64::from(slot_height_px)).floor();
    // f64::round rounds half away from zero
    let snapped = (raw_minute / f64::from(SNAP_MINUTES)).round() * f64::from(SNAP_MINUTES);
    snapped.clamp(0.0, f64::from(MAX_SNAPPED_MINUTE)) as u32
}

/// Which view a drag happened in; decides the slot height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragView {
    Day,
    Week,
}

impl DragView {
    pub fn slot_height(&self) -> f32 {
        match self {
            DragView::Day => DAY_SLOT_HEIGHT,
            DragView::Week => WEEK_SLOT_HEIGHT,
        }
    }
}

/// The task being dragged, identified by the bucket it currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSource {
    pub date: NaiveDate,
    pub task_id: u64,
}

/// Where the task was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub date: NaiveDate,
    pub hour: u32,
    pub relative_y: f32,
    pub slot_height_px: f32,
}

impl DropTarget {
    pub fn new(date: NaiveDate, hour: u32, relative_y: f32, view: DragView) -> Self {
        Self {
            date,
            hour,
            relative_y,
            slot_height_px: view.slot_height(),
        }
    }

    pub fn minute(&self) -> u32 {
        snap_minute(self.relative_y, self.slot_height_px)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    pub task: Task,
    pub moved_across_dates: bool,
}

/// Move the dragged task to the drop target.
///
/// Returns `None` and leaves the schedule untouched when the task is no
/// longer in the source bucket.
pub fn relocate(schedule: &mut Schedule, source: DragSource, target: DropTarget) -> Option<Relocation> {
    let minute = target.minute();
    let task = TaskService::new(schedule).move_task(
        source.date,
        source.task_id,
        target.date,
        target.hour,
        minute,
    )?;

    Some(Relocation {
        task,
        moved_across_dates: source.date != target.date,
    })
}

/// Vertical placement of a rendered task block inside its hour slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskGeometry {
    pub top: f32,
    pub height: f32,
}

/// Inverse of [`snap_minute`]: where a renderer should draw `task`.
pub fn task_geometry(task: &Task, slot_height_px: f32) -> TaskGeometry {
    let top = task.minute as f32 / 60.0 * slot_height_px;
    let height = (task.duration as f32 / 60.0 * slot_height_px - 2.0).max(MIN_TASK_HEIGHT);
    TaskGeometry { top, height }
}
