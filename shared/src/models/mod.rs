//! Data models
//!
//! Typed rows for the four store tables. Rust field names are English; the
//! serde renames carry the store's column names. All IDs are `i64`
//! (server-assigned integer primary keys).

pub mod assignment;
pub mod job_title;
pub mod report;
pub mod schedule;
pub mod user;

// Re-exports
pub use assignment::*;
pub use job_title::*;
pub use report::*;
pub use schedule::*;
pub use user::*;

use crate::error::{StoreError, StoreResult};

/// Local validation run before a draft or patch is dispatched
pub trait Validate {
    fn validate(&self) -> StoreResult<()>;
}

/// Reject blank required text
pub(crate) fn require_text(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Reject non-positive foreign key values
pub(crate) fn require_id(id: i64, field: &str) -> StoreResult<()> {
    if id <= 0 {
        return Err(StoreError::validation(format!("{field} must be selected")));
    }
    Ok(())
}
