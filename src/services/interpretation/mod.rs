//! Natural-language interpretation.
//!
//! An [`Interpreter`] turns a free-text request plus schedule context into a
//! raw response body. [`parse_response`] turns that body into an
//! [`OperationBatch`] for the reconciler. Failures here abandon the whole
//! batch; the schedule is never touched.

mod http;
mod request;

pub use http::HttpInterpreter;
pub use request::{build_request, InterpretRequest, RequestViewMode, WeekDate};

use serde_json::Value;

use crate::models::operation::OperationBatch;

#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// The service could not be reached or answered with an error status.
    #[error("interpretation service error: {0}")]
    Transport(String),

    /// The response body did not contain a JSON document.
    #[error("unreadable interpretation response: {0}")]
    Parse(String),
}

/// Source of operation batches for a natural-language request.
#[cfg_attr(test, mockall::automock)]
pub trait Interpreter {
    /// Send `request` and return the raw response body.
    fn interpret(&self, request: &InterpretRequest) -> Result<String, InterpretError>;
}

/// Parse a response body into a batch.
///
/// Models sometimes wrap the document in prose or code fences, so when the
/// body is not JSON the span from the first `{` to the last `}` is tried
/// before giving up.
pub fn parse_response(body: &str) -> Result<OperationBatch, InterpretError> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("Response is not plain JSON ({}), trying embedded object", err);
            embedded_object(body).ok_or_else(|| InterpretError::Parse(err.to_string()))?
        }
    };

    if !value.is_object() {
        return Err(InterpretError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    Ok(OperationBatch::from_value(&value))
}

fn embedded_object(body: &str) -> Option<Value> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&body[start..=end]).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operation::{BatchEntry, BatchKind, Operation};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_plain_operations() {
        let batch = parse_response(
            r#"{"operations": [{"action": "delete", "id": 2}], "message": "Removed lunch"}"#,
        )
        .unwrap();

        assert_eq!(batch.kind, BatchKind::Operations);
        assert_eq!(batch.message.as_deref(), Some("Removed lunch"));
        assert_eq!(
            batch.entries,
            vec![BatchEntry::Valid(Operation::Delete { id: 2, date: None })]
        );
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let body = "Sure! Here is your schedule:\n```json\n{\"operations\": [{\"action\": \"delete\", \"id\": 5}]}\n```\nAnything else?";
        let batch = parse_response(body).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_parse_legacy_tasks_shape() {
        let batch = parse_response(r#"{"tasks": [{"text": "Costco", "hour": 10}]}"#).unwrap();
        assert_eq!(batch.kind, BatchKind::Tasks);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_parse_garbage_is_error() {
        let err = parse_response("I could not understand that.").unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
    }

    #[test]
    fn test_parse_broken_braces_is_error() {
        let err = parse_response("} nothing here {").unwrap_err();
        assert!(matches!(err, InterpretError::Parse(_)));
    }

    #[test]
    fn test_parse_non_object_is_error() {
        let err = parse_response("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, InterpretError::Parse(ref msg) if msg.contains("array")));
    }

    #[test]
    fn test_parse_object_without_operations_is_empty_batch() {
        let batch = parse_response(r#"{"message": "Nothing to do"}"#).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.kind, BatchKind::Empty);
        assert_eq!(batch.message.as_deref(), Some("Nothing to do"));
    }

    #[test]
    fn test_mock_interpreter_round_trip() {
        let mut mock = MockInterpreter::new();
        mock.expect_interpret()
            .times(1)
            .returning(|_| Ok(r#"{"operations": []}"#.to_string()));

        let request = InterpretRequest::for_text("nothing");
        let body = mock.interpret(&request).unwrap();
        assert!(parse_response(&body).unwrap().is_empty());
    }
}
