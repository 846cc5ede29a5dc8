//! `{data, error}` outcome for presentation layers

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};

/// Operation outcome - exactly one of `data` / `error` is meaningful
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    /// Data (on success)
    pub data: Option<T>,
    /// Error (on failure)
    pub error: Option<StoreError>,
}

impl<T> Outcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: StoreError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Error message, if the operation failed
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> StoreResult<Option<T>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

impl<T> From<StoreResult<T>> for Outcome<T> {
    fn from(result: StoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err),
        }
    }
}
