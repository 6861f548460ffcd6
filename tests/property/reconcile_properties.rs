// Property tests for batch reconciliation and task id allocation

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

use skej::models::operation::{Operation, OperationBatch};
use skej::models::schedule::Schedule;
use skej::models::task::NewTask;
use skej::services::reconcile::OperationReconciler;
use skej::services::task::TaskService;
use skej::utils::date::ViewRange;

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1 + offset).unwrap()
}

/// A schedule with `count` tasks spread over the first week of March.
fn seeded(count: usize) -> Schedule {
    let mut schedule = Schedule::new();
    let mut tasks = TaskService::new(&mut schedule);
    for i in 0..count {
        tasks.add_task(day((i % 7) as u32), format!("Task {}", i), (i % 24) as u32, 0, 30, Vec::new());
    }
    schedule
}

proptest! {
    /// Property: an empty batch changes nothing, including the counter
    #[test]
    fn prop_empty_batch_is_noop(count in 0usize..20, offset in 0u32..7) {
        let mut schedule = seeded(count);
        let before = schedule.clone();

        let report = OperationReconciler::new(&mut schedule)
            .apply(OperationBatch::empty(), &ViewRange::day(day(offset)));

        prop_assert!(!report.summary.changed());
        prop_assert_eq!(schedule, before);
    }

    /// Property: a valid add grows its bucket by one with a fresh, larger id
    #[test]
    fn prop_add_grows_bucket(count in 0usize..20, offset in 0u32..7, hour in 0u32..24) {
        let mut schedule = seeded(count);
        let bucket_before = schedule.tasks_for(day(offset)).len();
        let max_id = schedule.iter().map(|t| t.id).max();

        let batch = OperationBatch::new(vec![Operation::Add {
            date: Some(day(offset)),
            task: NewTask::new("Walk", hour),
        }]);
        OperationReconciler::new(&mut schedule).apply(batch, &ViewRange::day(day(0)));

        let bucket = schedule.tasks_for(day(offset));
        prop_assert_eq!(bucket.len(), bucket_before + 1);
        let added = bucket.last().unwrap();
        if let Some(max_id) = max_id {
            prop_assert!(added.id > max_id);
        }
    }

    /// Property: whatever times the service sends, stored tasks stay in range
    #[test]
    fn prop_stored_tasks_keep_time_invariants(
        fields in proptest::collection::vec((any::<u32>(), any::<u32>(), any::<u32>()), 1..12),
        update in (any::<u32>(), any::<u32>(), any::<u32>()),
    ) {
        let mut schedule = seeded(3);
        let range = ViewRange::day(day(0));

        let mut operations: Vec<serde_json::Value> = fields
            .iter()
            .map(|(hour, minute, duration)| json!({
                "action": "add",
                "task": { "text": "Generated", "hour": hour, "minute": minute, "duration": duration }
            }))
            .collect();
        let (hour, minute, duration) = update;
        operations.push(json!({
            "action": "update",
            "id": 0,
            "changes": { "hour": hour, "minute": minute, "duration": duration }
        }));

        let report = OperationReconciler::new(&mut schedule)
            .apply(OperationBatch::from_value(&json!({ "operations": operations })), &range);

        prop_assert_eq!(report.summary.added + report.summary.updated + report.summary.ignored, fields.len() + 1);
        for task in schedule.iter() {
            prop_assert!(task.hour <= 23);
            prop_assert!(task.minute <= 59);
            prop_assert!(task.duration >= 1);
            prop_assert!(task.end_minutes() >= task.start_minutes());
        }
    }

    /// Property: updating an id that is not in the bucket leaves everything alone
    #[test]
    fn prop_unknown_update_is_noop(count in 0usize..20, missing in 1000u64..2000) {
        let mut schedule = seeded(count);
        let before = schedule.clone();

        let batch = OperationBatch::from_value(&json!({
            "operations": [{ "action": "update", "id": missing, "changes": { "text": "x" } }]
        }));
        let report = OperationReconciler::new(&mut schedule)
            .apply(batch, &ViewRange::week_of(day(0)));

        prop_assert_eq!(report.summary.ignored, 1);
        prop_assert_eq!(schedule, before);
    }

    /// Property: deleting twice is the same as deleting once
    #[test]
    fn prop_delete_is_idempotent(count in 1usize..20, pick in 0usize..20) {
        let mut once = seeded(count);
        let target = once.iter().nth(pick % count).cloned().unwrap();

        TaskService::new(&mut once).delete_task(target.date, target.id);
        let mut twice = once.clone();
        TaskService::new(&mut twice).delete_task(target.date, target.id);

        prop_assert_eq!(once, twice);
    }

    /// Property: ids are never reused, whatever is deleted in between
    #[test]
    fn prop_ids_strictly_increase(deletes in proptest::collection::vec(any::<bool>(), 1..30)) {
        let mut schedule = Schedule::new();
        let mut last: Option<u64> = None;

        for (i, delete) in deletes.into_iter().enumerate() {
            let mut tasks = TaskService::new(&mut schedule);
            let task = tasks.add_task(day(0), format!("T{}", i), 9, 0, 60, Vec::new());
            if let Some(last) = last {
                prop_assert!(task.id > last);
            }
            last = Some(task.id);
            if delete {
                tasks.delete_task(day(0), task.id);
            }
        }
    }
}
