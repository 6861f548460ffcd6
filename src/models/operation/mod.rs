// Operation module
// Structured edit instructions produced by the interpretation service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::task::{NewTask, TaskChanges};

/// One edit instruction, discriminated by its `action` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Operation {
    Add {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
        task: NewTask,
    },
    Update {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
        #[serde(default)]
        changes: TaskChanges,
    },
    Delete {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
    },
}

impl Operation {
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }

    /// Resolve the bucket this operation targets.
    ///
    /// The operation's own date wins, then (for adds) the task body's date,
    /// then `fallback`.
    pub fn target_date(&self, fallback: NaiveDate) -> NaiveDate {
        match self {
            Operation::Add { date, task } => date.or(task.date).unwrap_or(fallback),
            Operation::Update { date, .. } | Operation::Delete { date, .. } => {
                date.unwrap_or(fallback)
            }
        }
    }
}

/// A batch slot: either a recognised operation or a rejected raw entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    Valid(Operation),
    Invalid { raw: Value, reason: String },
}

impl BatchEntry {
    /// Parse one raw entry, never failing: unknown shapes become `Invalid`.
    pub fn from_value(raw: Value) -> Self {
        match serde_json::from_value::<Operation>(raw.clone()) {
            Ok(op) => BatchEntry::Valid(op),
            Err(err) => BatchEntry::Invalid {
                raw,
                reason: err.to_string(),
            },
        }
    }
}

/// Which response shape the batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// `{ "operations": [...] }`
    Operations,
    /// Older `{ "tasks": [...] }` responses, treated as a list of adds.
    Tasks,
    /// Neither key was present.
    Empty,
}

/// Ordered edit instructions from a single interpretation request.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationBatch {
    pub entries: Vec<BatchEntry>,
    pub message: Option<String>,
    pub kind: BatchKind,
}

impl OperationBatch {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            entries: operations.into_iter().map(BatchEntry::Valid).collect(),
            message: None,
            kind: BatchKind::Operations,
        }
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            message: None,
            kind: BatchKind::Empty,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Build a batch from a parsed response document.
    ///
    /// Each array element is checked on its own, so one malformed entry
    /// does not affect its neighbours.
    pub fn from_value(value: &Value) -> Self {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string);

        if let Some(operations) = value.get("operations").and_then(Value::as_array) {
            return Self {
                entries: operations.iter().cloned().map(BatchEntry::from_value).collect(),
                message,
                kind: BatchKind::Operations,
            };
        }

        if let Some(tasks) = value.get("tasks").and_then(Value::as_array) {
            let entries = tasks
                .iter()
                .cloned()
                .map(|raw| match serde_json::from_value::<NewTask>(raw.clone()) {
                    Ok(task) => BatchEntry::Valid(Operation::Add { date: None, task }),
                    Err(err) => BatchEntry::Invalid {
                        raw,
                        reason: err.to_string(),
                    },
                })
                .collect();
            return Self {
                entries,
                message,
                kind: BatchKind::Tasks,
            };
        }

        Self {
            message,
            ..Self::empty()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_parse_add_with_defaults() {
        let op: Operation =
            serde_json::from_value(json!({"action": "add", "task": {"text": "Gym", "hour": 7}}))
                .unwrap();
        match op {
            Operation::Add { date, task } => {
                assert_eq!(date, None);
                assert_eq!(task.text, "Gym");
                assert_eq!(task.minute, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_without_changes() {
        let op: Operation =
            serde_json::from_value(json!({"action": "update", "id": 4})).unwrap();
        assert_eq!(
            op,
            Operation::Update {
                id: 4,
                date: None,
                changes: TaskChanges::default()
            }
        );
    }

    #[test]
    fn test_unknown_action_is_invalid() {
        let entry = BatchEntry::from_value(json!({"action": "reschedule", "id": 1}));
        assert!(matches!(entry, BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_missing_discriminator_is_invalid() {
        let entry = BatchEntry::from_value(json!({"id": 1}));
        assert!(matches!(entry, BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_add_without_body_is_invalid() {
        let entry = BatchEntry::from_value(json!({"action": "add", "date": "2024-01-02"}));
        assert!(matches!(entry, BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_delete_without_id_is_invalid() {
        let entry = BatchEntry::from_value(json!({"action": "delete"}));
        assert!(matches!(entry, BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_malformed_date_is_invalid() {
        let entry = BatchEntry::from_value(json!({"action": "delete", "id": 2, "date": "tomorrow"}));
        assert!(matches!(entry, BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_target_date_resolution_order() {
        let mut task = NewTask::new("Read", 20);
        task.date = Some(date(3));

        let explicit = Operation::Add {
            date: Some(date(2)),
            task: task.clone(),
        };
        assert_eq!(explicit.target_date(date(1)), date(2));

        let from_body = Operation::Add { date: None, task };
        assert_eq!(from_body.target_date(date(1)), date(3));

        let fallback = Operation::Delete { id: 0, date: None };
        assert_eq!(fallback.target_date(date(1)), date(1));
    }

    #[test]
    fn test_batch_from_operations_document() {
        let doc = json!({
            "operations": [
                {"action": "add", "task": {"text": "Gym", "hour": 7}},
                {"action": "bogus"},
                {"action": "delete", "id": 3}
            ],
            "message": "Added gym, removed lunch"
        });

        let batch = OperationBatch::from_value(&doc);
        assert_eq!(batch.kind, BatchKind::Operations);
        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.entries[1], BatchEntry::Invalid { .. }));
        assert_eq!(batch.message.as_deref(), Some("Added gym, removed lunch"));
    }

    #[test]
    fn test_batch_from_legacy_tasks_document() {
        let doc = json!({"tasks": [{"text": "Costco", "hour": 10}, {"hour": 3}]});

        let batch = OperationBatch::from_value(&doc);
        assert_eq!(batch.kind, BatchKind::Tasks);
        assert!(matches!(
            batch.entries[0],
            BatchEntry::Valid(Operation::Add { .. })
        ));
        assert!(matches!(batch.entries[1], BatchEntry::Invalid { .. }));
    }

    #[test]
    fn test_batch_without_known_keys_is_empty() {
        let batch = OperationBatch::from_value(&json!({"operations": "nope", "message": "Hi"}));
        assert_eq!(batch.kind, BatchKind::Empty);
        assert!(batch.is_empty());
        assert_eq!(batch.message.as_deref(), Some("Hi"));
    }
}
