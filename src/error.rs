// API error taxonomy for the data-access layer.
//
// Every failure a controller can surface resolves into one of these variants.
// Cancellation is deliberately absent: a superseded or disposed request
// attempt is dropped before it can produce an error.

use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Failure of a single request attempt or write operation.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The transport completed but the response status was non-2xx.
    ///
    /// `message` is already the most specific text available: the body's
    /// `message` field when the body is JSON and carries one, otherwise the
    /// HTTP status line, otherwise a generic fallback.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        /// Parsed JSON body, when the response carried one.
        body: Option<Value>,
    },

    /// The underlying call could not complete (DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A JSON content-type whose body is not valid JSON, or a payload that
    /// does not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Human-readable message for display, mirroring the `Display` output.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status code, when the failure came from a completed response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an `Http` error from a status code and an already-parsed body,
    /// resolving the display message in specificity order.
    pub fn from_status(status: u16, status_text: &str, body: Option<Value>) -> Self {
        let body_message = body
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(|s| s.to_string());

        let message = match body_message {
            Some(m) if !m.is_empty() => m,
            _ if !status_text.is_empty() => format!("{status} {status_text}"),
            _ => format!("Request failed with status {status}"),
        };

        ApiError::Http {
            status,
            message,
            body,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
