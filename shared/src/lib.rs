//! Shared types for the school administration workspace
//!
//! Typed table rows, drafts and patches, the unified store error, and the
//! display formatting every view uses.

pub mod error;
pub mod format;
pub mod models;
pub mod outcome;
pub mod serde_helpers;

// Re-exports
pub use error::{ErrorKind, StoreError, StoreResult};
pub use models::Validate;
pub use outcome::Outcome;
pub use serde::{Deserialize, Serialize};
