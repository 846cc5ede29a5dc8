//! In-memory join of assignments with their referenced rows
//!
//! An assignment's `user_id`, `job_title_id` and `schedule_id` match the row
//! with the same `id` in the corresponding list. Nothing else is compared.

use shared::format::{self, NOT_AVAILABLE};
use shared::models::{Assignment, JobTitle, Schedule, User};
use std::collections::HashMap;
use std::fmt;

/// A foreign key after the join
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Matched; carries the display label
    Resolved(String),
    /// Key present but no row with that id in the lookup list
    Unresolved(i64),
    /// Optional key not set
    None,
}

impl Reference {
    pub fn label(&self) -> &str {
        match self {
            Self::Resolved(label) => label,
            Self::Unresolved(_) | Self::None => NOT_AVAILABLE,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignment with labels for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub assignment: Assignment,
    pub user: Reference,
    pub job_title: Reference,
    pub schedule: Reference,
}

impl AssignmentRow {
    pub fn id(&self) -> i64 {
        self.assignment.id
    }

    /// `YYYY-MM-DD`
    pub fn effective_date(&self) -> String {
        format::date(&self.assignment.effective_date)
    }
}

fn resolve(labels: &HashMap<i64, String>, id: i64) -> Reference {
    labels
        .get(&id)
        .map_or(Reference::Unresolved(id), |label| Reference::Resolved(label.clone()))
}

/// Join assignments with users, job titles and schedules
///
/// Output order follows `assignments`.
pub fn join_assignments(
    assignments: &[Assignment],
    users: &[User],
    job_titles: &[JobTitle],
    schedules: &[Schedule],
) -> Vec<AssignmentRow> {
    let user_labels: HashMap<i64, String> =
        users.iter().map(|u| (u.id, u.full_name.clone())).collect();
    let title_labels: HashMap<i64, String> =
        job_titles.iter().map(|j| (j.id, j.name.clone())).collect();
    let schedule_labels: HashMap<i64, String> =
        schedules.iter().map(|s| (s.id, s.label())).collect();

    assignments
        .iter()
        .map(|a| AssignmentRow {
            assignment: a.clone(),
            user: resolve(&user_labels, a.user_id),
            job_title: resolve(&title_labels, a.job_title_id),
            schedule: a
                .schedule_id
                .map_or(Reference::None, |id| resolve(&schedule_labels, id)),
        })
        .collect()
}
