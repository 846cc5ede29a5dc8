//! Assignment Repository
//!
//! Plain CRUD on `usuarios_cargos` plus the joined listing used by the
//! assignments view.

use super::{Entity, JobTitleRepository, Repository, ScheduleRepository, UserRepository};
use crate::join::{AssignmentRow, join_assignments};
use crate::store::SortDirection;
use shared::models::{Assignment, AssignmentCreate, AssignmentUpdate, JobTitle, Schedule, User};
use shared::{StoreError, StoreResult};

impl Entity for Assignment {
    const TABLE: &'static str = "usuarios_cargos";
    const COLUMNS: &'static str = "id, id_usuario, id_cargo, id_horario, fecha_asignacion";
    const ORDER: SortDirection = SortDirection::Descending;
    const LABEL: &'static str = "Assignment";

    type Create = AssignmentCreate;
    type Update = AssignmentUpdate;

    fn id(&self) -> i64 {
        self.id
    }
}

pub type AssignmentRepository = Repository<Assignment>;

/// Result of [`AssignmentRepository::list_joined`]
///
/// The lookup lists are returned alongside the rows so a view can build its
/// selection options without fetching them again.
#[derive(Debug, Clone, Default)]
pub struct AssignmentListing {
    pub rows: Vec<AssignmentRow>,
    pub users: Vec<User>,
    pub job_titles: Vec<JobTitle>,
    pub schedules: Vec<Schedule>,
    /// Lookup failures that degraded labels to placeholders
    pub lookup_errors: Vec<StoreError>,
}

impl AssignmentListing {
    /// True when every lookup list loaded
    pub fn is_complete(&self) -> bool {
        self.lookup_errors.is_empty()
    }
}

fn lookup_or_empty<T>(
    result: StoreResult<Vec<T>>,
    table: &str,
    errors: &mut Vec<StoreError>,
) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(table, error = %e, "Lookup list failed, labels degrade to placeholders");
            errors.push(e);
            Vec::new()
        }
    }
}

impl Repository<Assignment> {
    /// Assignments joined with user, job title and schedule labels
    ///
    /// The four lists are fetched concurrently. Only a failure of the
    /// assignment list fails the call.
    pub async fn list_joined(
        &self,
        users: &UserRepository,
        job_titles: &JobTitleRepository,
        schedules: &ScheduleRepository,
    ) -> StoreResult<AssignmentListing> {
        let (assignments, users, job_titles, schedules) = futures::join!(
            self.list(),
            users.list(),
            job_titles.list(),
            schedules.list()
        );
        let assignments = assignments?;

        let mut lookup_errors = Vec::new();
        let users = lookup_or_empty(users, User::TABLE, &mut lookup_errors);
        let job_titles = lookup_or_empty(job_titles, JobTitle::TABLE, &mut lookup_errors);
        let schedules = lookup_or_empty(schedules, Schedule::TABLE, &mut lookup_errors);

        let rows = join_assignments(&assignments, &users, &job_titles, &schedules);
        tracing::debug!(
            count = rows.len(),
            degraded = lookup_errors.len(),
            "Joined assignments"
        );

        Ok(AssignmentListing {
            rows,
            users,
            job_titles,
            schedules,
            lookup_errors,
        })
    }
}
