use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use super::{InterpretError, InterpretRequest, Interpreter};
use crate::models::settings::Settings;

/// Interpreter that POSTs the request as JSON to an HTTP endpoint.
pub struct HttpInterpreter {
    client: Client,
    endpoint: String,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpInterpreter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build interpretation HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            max_retries: 1,
            retry_delay_ms: 400,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.interpreter_endpoint.trim(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send_once(&self, request: &InterpretRequest) -> Result<String, SendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|err| {
                if err.is_connect() {
                    SendError::Connect(err.to_string())
                } else {
                    SendError::Fatal(InterpretError::Transport(err.to_string()))
                }
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| {
            SendError::Fatal(InterpretError::Transport(format!(
                "failed to read response body: {}",
                err
            )))
        })?;

        if !status.is_success() {
            let detail = error_detail(&body).unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(SendError::Fatal(InterpretError::Transport(detail)));
        }

        Ok(body)
    }
}

enum SendError {
    /// Nothing reached the service; safe to try again.
    Connect(String),
    Fatal(InterpretError),
}

impl Interpreter for HttpInterpreter {
    fn interpret(&self, request: &InterpretRequest) -> Result<String, InterpretError> {
        log::info!(
            "Sending interpretation request ({} existing, {} historical tasks)",
            request.existing_tasks.len(),
            request.historical_tasks.len()
        );

        let mut attempt = 0;
        loop {
            match self.send_once(request) {
                Ok(body) => return Ok(body),
                Err(SendError::Fatal(err)) => return Err(err),
                Err(SendError::Connect(message)) => {
                    if attempt == self.max_retries {
                        return Err(InterpretError::Transport(format!(
                            "could not reach {} after {} attempts: {}",
                            self.endpoint,
                            attempt + 1,
                            message
                        )));
                    }
                    log::warn!(
                        "Interpretation attempt {} could not connect: {}",
                        attempt + 1,
                        message
                    );
                    attempt += 1;
                    thread::sleep(Duration::from_millis(self.retry_delay_ms));
                }
            }
        }
    }
}

/// Pull a human readable reason out of an error response body.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["details", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::net::TcpListener;

    const PATH: &str = "/api/schedule-text";

    fn interpreter_for(server: &Server) -> HttpInterpreter {
        HttpInterpreter::new(format!("{}{}", server.url(), PATH), Duration::from_secs(5)).unwrap()
    }

    /// A local address with nothing listening on it.
    fn unreachable_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}{}", addr, PATH)
    }

    #[test]
    fn test_error_detail_prefers_details() {
        assert_eq!(
            error_detail(r#"{"error": "Failed", "details": "quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(error_detail(r#"{"error": "No text provided"}"#).as_deref(), Some("No text provided"));
        assert_eq!(error_detail("<html>502</html>"), None);
        assert_eq!(error_detail(r#"{"details": ""}"#), None);
    }

    #[test]
    fn test_successful_response_returns_body() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({"text": "buy milk", "viewMode": "daily"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"operations": []}"#)
            .create();

        let body = interpreter_for(&server)
            .interpret(&InterpretRequest::for_text("buy milk"))
            .unwrap();

        assert_eq!(body, r#"{"operations": []}"#);
        mock.assert();
    }

    #[test]
    fn test_error_status_carries_details() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Failed to process", "details": "model overloaded"}"#)
            .expect(1)
            .create();

        let err = interpreter_for(&server)
            .interpret(&InterpretRequest::for_text("buy milk"))
            .unwrap_err();

        match err {
            InterpretError::Transport(message) => assert_eq!(message, "model overloaded"),
            other => panic!("expected transport error, got {:?}", other),
        }
        // Only connection failures are retried
        mock.assert();
    }

    #[test]
    fn test_error_status_without_details_reports_status() {
        let mut server = Server::new();
        let mock = server.mock("POST", PATH).with_status(502).with_body("Bad Gateway").create();

        let err = interpreter_for(&server)
            .interpret(&InterpretRequest::for_text("buy milk"))
            .unwrap_err();

        match err {
            InterpretError::Transport(message) => assert!(message.contains("502"), "{}", message),
            other => panic!("expected transport error, got {:?}", other),
        }
        mock.assert();
    }

    #[test]
    fn test_connect_failure_retries_then_gives_up() {
        let mut interpreter =
            HttpInterpreter::new(unreachable_endpoint(), Duration::from_secs(5)).unwrap();
        interpreter.max_retries = 2;
        interpreter.retry_delay_ms = 0;

        let err = interpreter
            .interpret(&InterpretRequest::for_text("buy milk"))
            .unwrap_err();

        match err {
            InterpretError::Transport(message) => {
                assert!(message.contains("after 3 attempts"), "{}", message)
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_settings_uses_endpoint() {
        let settings = Settings::default();
        let interpreter = HttpInterpreter::from_settings(&settings).unwrap();
        assert_eq!(interpreter.endpoint(), settings.interpreter_endpoint);
    }
}
