// Test fixtures - reusable test data
// Provides consistent dates, schedules and batches across test files

#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::{json, Value};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, Jan 1, 2024
    pub fn new_years_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Sunday, Dec 31, 2023 (start of the week containing Jan 1, 2024)
    pub fn week_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
    }

    /// Thursday, Feb 29, 2024 (leap day)
    pub fn leap_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    pub fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }
}

/// Sample interpretation responses
pub mod batches {
    use super::*;

    /// "Gym at 7 with warmup, lift and stretch"
    pub fn gym_add() -> Value {
        json!({
            "operations": [{
                "action": "add",
                "task": {
                    "text": "Gym",
                    "hour": 7,
                    "subtasks": ["Warmup", "Lift", "Stretch"]
                }
            }]
        })
    }

    /// One valid add, one unknown action and one update of a missing id
    pub fn mixed_validity() -> Value {
        json!({
            "operations": [
                { "action": "add", "task": { "text": "Lunch", "hour": 12, "minute": 30 } },
                { "action": "reschedule", "id": 1 },
                { "action": "update", "id": 999, "changes": { "hour": 9 } }
            ]
        })
    }

    /// Old single-list response shape
    pub fn legacy_tasks() -> Value {
        json!({
            "tasks": [
                { "text": "Costco", "hour": 10 },
                { "text": "Dinner with Sam", "hour": 19 }
            ]
        })
    }
}
