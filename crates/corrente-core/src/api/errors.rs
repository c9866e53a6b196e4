use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Categories of API errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Request never produced a response (connect failure, timeout, DNS)
    Network,
    /// Non-2xx HTTP status
    HttpStatus,
    /// Response body could not be decoded
    Parse,
    /// 2xx response whose envelope reports `success: false`
    Server,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Server => write!(f, "server"),
        }
    }
}

/// Structured error from the API with kind and details.
///
/// `message` is the single line shown next to the control that triggered
/// the request; it is the server's own message whenever one was sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Raw body or transport error text
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn network(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out".to_string()
        } else if err.is_connect() {
            "Could not connect to the server".to_string()
        } else {
            "Network request failed".to_string()
        };
        Self {
            kind: ApiErrorKind::Network,
            message,
            status: None,
            details: Some(err.to_string()),
        }
    }

    /// Creates an HTTP status error, preferring the server's message.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            status: Some(status),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Parse, message)
    }

    pub fn server(message: Option<String>) -> Self {
        Self::new(
            ApiErrorKind::Server,
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Request was rejected by the server".to_string()),
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401 | 403))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Pulls a human-readable message out of a JSON error body.
///
/// Accepts `{"message": ".."}`, `{"error": ".."}` and `{"error": {"message": ".."}}`.
fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let candidate = json
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| json.get("error").and_then(Value::as_str))
        .or_else(|| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })?;
    let trimmed = candidate.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
