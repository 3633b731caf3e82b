//! Normalized API error body
//!
//! Every failed call surfaces as this shape, whether the server sent it or the
//! client synthesized it from a transport fault.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::{FALLBACK_ERROR_MESSAGE, NETWORK_ERROR_CODE};

/// `{ error, message, details? }` as declared by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ApiErrorBody {
    /// Machine-readable code (e.g. "authentication_error", "network_error")
    pub error: String,
    /// Human-readable text
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

/// Optional detail attached to a failure.
///
/// `field` and `code` are the keys the server commonly sends; any other keys
/// are kept in `extra` so the body round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "ts-gen", ts(skip))]
    pub extra: Map<String, Value>,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error: error.into(), message: message.into(), details: None }
    }

    /// Client-synthesized failure. An empty message falls back to a generic
    /// one so callers always have text to show.
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        let message =
            if message.trim().is_empty() { FALLBACK_ERROR_MESSAGE.to_string() } else { message };
        Self::new(NETWORK_ERROR_CODE, message)
    }

    pub fn with_details(mut self, details: ErrorDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn is_network_error(&self) -> bool {
        self.error == NETWORK_ERROR_CODE
    }

    /// Recognize a structured error in a raw response body.
    ///
    /// Accepts the bare shape and the `{"detail": {...}}` envelope the server
    /// framework wraps errors in. Anything else (non-JSON, plain strings,
    /// validation arrays) yields `None`.
    pub fn from_response_body(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        Self::from_value(&value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if object.contains_key("error") && object.contains_key("message") {
            return serde_json::from_value(value.clone()).ok();
        }

        match object.get("detail") {
            Some(inner @ Value::Object(_)) => Self::from_value(inner),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ApiErrorBody {}
