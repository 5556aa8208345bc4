//! Error types for request execution.
//!
//! # Design
//! Every failure a request can produce lands in one of five variants. The
//! `Display` output doubles as the human-readable message that state
//! containers store in their `error` field, so `Http` renders its status code
//! into the message and callers that only see the string can still recover
//! it.

use thiserror::Error;

/// Errors returned by `RequestExecutor::execute` and everything built on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No response was received: connection refused, DNS failure, reset.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived with a status outside 200-299.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The response body was not valid JSON, or did not match the expected type.
    #[error("parse error: {0}")]
    Parse(String),

    /// The request could not be built, e.g. an invalid URL or header. Nothing
    /// was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RequestError {
    pub fn http(status: u16) -> Self {
        RequestError::Http {
            status,
            message: format!("HTTP error! status: {status}"),
        }
    }

    /// The HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
