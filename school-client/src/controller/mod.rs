//! View controllers
//!
//! State objects a presentation layer renders: item snapshots, loading and
//! submitting flags, the editing target and the last user-facing notice.
//! Mutations take `&mut self`, so a second dispatch on the same controller
//! cannot start before the first resolves.

pub mod assignment;
pub mod crud;
pub mod report;

pub use assignment::AssignmentController;
pub use crud::CrudController;
pub use report::ReportController;

use serde::Serialize;
use shared::StoreError;
use shared::models::{JobTitle, Schedule, User};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// User-facing message produced by a controller action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StoreError>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            error: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    /// Notice for a failed call
    ///
    /// Local validation failures are warnings; store failures are errors
    /// carrying the store's message verbatim.
    pub fn from_error(error: StoreError) -> Self {
        let level = if error.is_validation() {
            NoticeLevel::Warning
        } else {
            NoticeLevel::Error
        };
        Self {
            level,
            message: error.message.clone(),
            error: Some(error),
        }
    }
}

/// Entry of a selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComboOption {
    pub id: i64,
    pub label: String,
}

impl From<&User> for ComboOption {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            label: format!("{} ({})", user.full_name, user.email),
        }
    }
}

impl From<&JobTitle> for ComboOption {
    fn from(job_title: &JobTitle) -> Self {
        Self {
            id: job_title.id,
            label: job_title.name.clone(),
        }
    }
}

impl From<&Schedule> for ComboOption {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id,
            label: schedule.label(),
        }
    }
}

pub(crate) fn options<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<ComboOption>
where
    ComboOption: From<&'a T>,
{
    items.into_iter().map(ComboOption::from).collect()
}
