//! Unified store error
//!
//! Every repository and gateway operation resolves to [`StoreResult`]. The
//! error carries a [`ErrorKind`] so callers can tell a local validation
//! failure from a store rejection or a transport failure, plus whatever the
//! store reported alongside its message (SQLSTATE code, details, hint).
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorKind, StoreError};
//! use serde_json::json;
//!
//! let err = StoreError::from_payload(&json!({
//!     "code": "23503",
//!     "message": "update or delete on table \"cargos\" violates foreign key constraint"
//! }));
//! assert_eq!(err.kind, ErrorKind::Rejection);
//! assert!(err.is_foreign_key_violation());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used when the store gave nothing usable to report
pub const UNKNOWN_ERROR: &str = "unknown error";

/// SQLSTATE codes the store reports for constraint violations
pub mod sqlstate {
    pub const NOT_NULL_VIOLATION: &str = "23502";
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const UNIQUE_VIOLATION: &str = "23505";
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Rejected locally before dispatch
    Validation,
    /// The store answered with an error (constraint violation, bad request, ...)
    Rejection,
    /// No usable answer: network failure, timeout, unexpected response shape
    Transport,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Rejection => "rejection",
            Self::Transport => "transport",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Store error with a kind and a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
    /// SQLSTATE or store-specific error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create an error of the given kind with a message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    // ==================== Convenience constructors ====================

    /// Local validation failure (never dispatched)
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, msg)
    }

    /// Store rejection with a message
    pub fn rejection(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejection, msg)
    }

    /// Transport or unexpected-shape failure
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, msg)
    }

    /// Store rejection carrying a SQLSTATE code
    pub fn constraint(code: &str, msg: impl Into<String>) -> Self {
        Self::rejection(msg).with_code(code)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Build a rejection from the store's native error payload.
    ///
    /// The message is taken from the `message` field when present, then from
    /// the payload's own string form, then [`UNKNOWN_ERROR`].
    pub fn from_payload(payload: &Value) -> Self {
        let mut err = Self::rejection(message_of(payload));
        if let Value::Object(map) = payload {
            err.code = map.get("code").and_then(text_of);
            err.details = map.get("details").and_then(text_of);
            err.hint = map.get("hint").and_then(text_of);
        }
        err
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }

    pub fn is_rejection(&self) -> bool {
        self.kind == ErrorKind::Rejection
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.code.as_deref() == Some(sqlstate::FOREIGN_KEY_VIOLATION)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(sqlstate::UNIQUE_VIOLATION)
    }
}

fn message_of(payload: &Value) -> String {
    match payload {
        Value::Null => UNKNOWN_ERROR.to_string(),
        Value::String(s) if s.trim().is_empty() => UNKNOWN_ERROR.to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(m)) if !m.trim().is_empty() => m.clone(),
            Some(Value::Null) | None if map.is_empty() => UNKNOWN_ERROR.to_string(),
            _ => payload.to_string(),
        },
        other => other.to_string(),
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::transport(format!("unexpected row shape: {err}"))
    }
}
