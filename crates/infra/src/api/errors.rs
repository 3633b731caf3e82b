//! API-specific error types
//!
//! Every failure from the access layer is one of two kinds, and both carry the
//! same normalized [`ApiErrorBody`] so callers have a single handling path.

use lifeos_domain::{ApiErrorBody, LifeosError};
use reqwest::StatusCode;
use thiserror::Error;

/// Kinds of API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The server answered with a recognized error body
    Structured,
    /// Anything else: connection failure, timeout, unrecognized or malformed body
    Network,
}

/// API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{body}")]
    Structured { status: u16, body: ApiErrorBody },

    #[error("{body}")]
    Network { status: Option<u16>, body: ApiErrorBody },
}

impl ApiError {
    /// Normalize a non-success response.
    ///
    /// A body in the declared error shape is kept as-is; otherwise the message
    /// mirrors what HTTP client libraries report for a bare status failure.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let code = status.as_u16();
        match ApiErrorBody::from_response_body(body) {
            Some(body) => Self::Structured { status: code, body },
            None => Self::Network {
                status: Some(code),
                body: ApiErrorBody::network(format!("Request failed with status code {code}")),
            },
        }
    }

    /// Normalize a transport failure (no usable response).
    pub fn from_transport(err: &LifeosError) -> Self {
        let message = match err {
            LifeosError::Network(message)
            | LifeosError::InvalidInput(message)
            | LifeosError::Config(message)
            | LifeosError::Storage(message)
            | LifeosError::Internal(message) => message.clone(),
        };
        Self::network(message)
    }

    /// Synthesized `network_error` without an HTTP status.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { status: None, body: ApiErrorBody::network(message) }
    }

    /// Structured or network failure.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Structured { .. } => ApiErrorKind::Structured,
            Self::Network { .. } => ApiErrorKind::Network,
        }
    }

    /// The normalized error shape.
    pub fn body(&self) -> &ApiErrorBody {
        match self {
            Self::Structured { body, .. } | Self::Network { body, .. } => body,
        }
    }

    /// Consume the error, keeping only the normalized shape.
    pub fn into_body(self) -> ApiErrorBody {
        match self {
            Self::Structured { body, .. } | Self::Network { body, .. } => body,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Structured { status, .. } => Some(*status),
            Self::Network { status, .. } => *status,
        }
    }

    /// Whether the server answered 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED.as_u16())
    }
}

impl From<ApiError> for ApiErrorBody {
    fn from(err: ApiError) -> Self {
        err.into_body()
    }
}
