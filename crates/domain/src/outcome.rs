//! Normalized call outcomes.
//!
//! Every HTTP call, successful or not, produces a [`CallOutcome`]. Transport
//! failures are represented as outcomes with status code 0 and a failure
//! kind tag; they never propagate as errors past the executor boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::HttpMethod;

/// Why a call failed before an HTTP status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request timed out.
    Timeout,
    /// The connection could not be established.
    Connection,
    /// Any other transport-level failure.
    Transport,
}

impl FailureKind {
    /// Human-readable tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Transport => "transport",
        }
    }
}

/// Transport failure details attached to a status-0 outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Message from the transport layer.
    pub message: String,
}

/// Response body, parsed as JSON when possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Empty body.
    #[default]
    Empty,
    /// Body that parsed as JSON.
    Json(Value),
    /// Non-JSON body kept as raw text.
    Text(String),
}

impl ResponseBody {
    /// Parses raw text: JSON when it decodes, raw text otherwise, empty
    /// when blank.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        serde_json::from_str::<Value>(text)
            .map_or_else(|_| Self::Text(text.to_string()), Self::Json)
    }

    /// The parsed JSON value, if this body is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// The normalized result of one HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Method that was issued.
    pub method: HttpMethod,
    /// Final URL the call was sent to.
    pub url: String,
    /// HTTP status code; 0 for transport failures.
    pub status: u16,
    /// True for 2xx statuses.
    pub success: bool,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Response body.
    #[serde(default)]
    pub body: ResponseBody,
    /// Elapsed wall time in milliseconds.
    pub time_ms: u64,
    /// Transport failure details, present only when `status` is 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CallFailure>,
}

impl CallOutcome {
    /// Creates an outcome from a completed HTTP exchange.
    #[must_use]
    pub fn completed(
        method: HttpMethod,
        url: impl Into<String>,
        status: u16,
        headers: BTreeMap<String, String>,
        body: ResponseBody,
        time_ms: u64,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            status,
            success: (200..300).contains(&status),
            headers,
            body,
            time_ms,
            error: None,
        }
    }

    /// Creates a status-0 outcome for a transport failure.
    #[must_use]
    pub fn failed(
        method: HttpMethod,
        url: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            method,
            url: url.into(),
            status: 0,
            success: false,
            headers: BTreeMap::new(),
            body: ResponseBody::Empty,
            time_ms: 0,
            error: Some(CallFailure {
                kind,
                message: message.into(),
            }),
        }
    }

    /// A compact view for display: status, success flag, body.
    #[must_use]
    pub fn summary(&self) -> Value {
        serde_json::json!({
            "status_code": self.status,
            "success": self.success,
            "data": match &self.body {
                ResponseBody::Empty => Value::Null,
                ResponseBody::Json(v) => v.clone(),
                ResponseBody::Text(t) => Value::String(t.clone()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_body_parses_json() {
        let body = ResponseBody::from_text(r#"{"ok": true}"#);
        assert_eq!(body.as_json(), Some(&json!({"ok": true})));
    }

    #[test]
    fn test_body_falls_back_to_text() {
        let body = ResponseBody::from_text("<html>oops</html>");
        assert_eq!(body, ResponseBody::Text("<html>oops</html>".to_string()));
    }

    #[test]
    fn test_body_empty() {
        assert_eq!(ResponseBody::from_text(""), ResponseBody::Empty);
    }

    #[test]
    fn test_completed_success_flag() {
        let outcome = CallOutcome::completed(
            HttpMethod::Get,
            "https://sit.campus.internal/x",
            204,
            BTreeMap::new(),
            ResponseBody::Empty,
            12,
        );
        assert!(outcome.success);

        let outcome = CallOutcome::completed(
            HttpMethod::Get,
            "https://sit.campus.internal/x",
            500,
            BTreeMap::new(),
            ResponseBody::Empty,
            12,
        );
        assert!(!outcome.success);
    }

    #[test]
    fn test_failed_outcome_has_status_zero() {
        let outcome = CallOutcome::failed(
            HttpMethod::Post,
            "https://sit.campus.internal/x",
            FailureKind::Timeout,
            "request timed out",
        );
        assert_eq!(outcome.status, 0);
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_ref().map(|e| e.kind), Some(FailureKind::Timeout));
    }

    #[test]
    fn test_summary_shape() {
        let outcome = CallOutcome::completed(
            HttpMethod::Get,
            "https://sit.campus.internal/x",
            200,
            BTreeMap::new(),
            ResponseBody::Json(json!({"id": 1})),
            3,
        );
        assert_eq!(
            outcome.summary(),
            json!({"status_code": 200, "success": true, "data": {"id": 1}})
        );
    }
}
