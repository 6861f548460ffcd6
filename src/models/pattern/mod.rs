// Pattern module
// Inputs and outputs of recurring-task detection, plus the task views
// handed to the interpretation service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One past task occurrence used for pattern detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalTask {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub text: String,
    pub hour: u32,
    pub duration: u32,
}

/// A recurring-task hint. Derived per request and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCandidate {
    pub text: String,
    pub day_of_week: String,
    pub representative_hour: u32,
    pub occurrence_count: usize,
}

/// A task from the range being edited, as shown to the interpreter so it
/// can reference ids in update and delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTask {
    pub id: u64,
    pub date: NaiveDate,
    pub day_name: String,
    pub text: String,
    pub hour: u32,
    pub minute: u32,
    pub duration: u32,
}
