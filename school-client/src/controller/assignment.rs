//! Assignments view controller

use super::{ComboOption, Notice, options};
use crate::join::AssignmentRow;
use crate::repository::{
    AssignmentRepository, JobTitleRepository, ScheduleRepository, UserRepository,
};
use crate::store::DataStore;
use shared::Validate;
use shared::models::{AssignmentCreate, AssignmentUpdate};
use std::sync::Arc;

/// Joined assignment list plus the selection lists of the create form
pub struct AssignmentController {
    assignments: AssignmentRepository,
    users: UserRepository,
    job_titles: JobTitleRepository,
    schedules: ScheduleRepository,

    rows: Vec<AssignmentRow>,
    user_options: Vec<ComboOption>,
    job_title_options: Vec<ComboOption>,
    schedule_options: Vec<ComboOption>,
    loading: bool,
    editing: Option<i64>,
    submitting: bool,
    last_notice: Option<Notice>,
}

impl AssignmentController {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            assignments: AssignmentRepository::new(Arc::clone(&store)),
            users: UserRepository::new(Arc::clone(&store)),
            job_titles: JobTitleRepository::new(Arc::clone(&store)),
            schedules: ScheduleRepository::new(store),
            rows: Vec::new(),
            user_options: Vec::new(),
            job_title_options: Vec::new(),
            schedule_options: Vec::new(),
            loading: false,
            editing: None,
            submitting: false,
            last_notice: None,
        }
    }

    pub fn rows(&self) -> &[AssignmentRow] {
        &self.rows
    }

    /// Users as `name (email)`
    pub fn user_options(&self) -> &[ComboOption] {
        &self.user_options
    }

    pub fn job_title_options(&self) -> &[ComboOption] {
        &self.job_title_options
    }

    /// Schedules as `HH:MM - HH:MM`
    pub fn schedule_options(&self) -> &[ComboOption] {
        &self.schedule_options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Id of the assignment being edited
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn editing_row(&self) -> Option<&AssignmentRow> {
        self.editing.and_then(|id| self.row(id))
    }

    fn row(&self, id: i64) -> Option<&AssignmentRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    /// Reload rows and selection lists
    ///
    /// Lookup failures leave placeholders in the rows and raise a warning.
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        let result = self
            .assignments
            .list_joined(&self.users, &self.job_titles, &self.schedules)
            .await;
        self.loading = false;

        let listing = match result {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load assignments");
                self.last_notice = Some(Notice::from_error(e));
                return false;
            }
        };

        if let Some(first) = listing.lookup_errors.first() {
            self.last_notice = Some(Notice::warning(format!(
                "Some related records could not be loaded: {}",
                first.message
            )));
        }
        self.user_options = options(&listing.users);
        self.job_title_options = options(&listing.job_titles);
        self.schedule_options = options(&listing.schedules);
        self.rows = listing.rows;
        true
    }

    pub async fn on_create(&mut self, draft: AssignmentCreate) -> bool {
        if let Err(e) = draft.validate() {
            self.last_notice = Some(Notice::from_error(e));
            return false;
        }

        self.submitting = true;
        let result = self.assignments.create(&draft).await;
        self.submitting = false;

        match result {
            Ok(created) => {
                tracing::info!(id = created.id, "Assignment created");
                self.last_notice = Some(Notice::success("Assignment created"));
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create assignment");
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    pub fn on_start_edit(&mut self, id: i64) -> bool {
        if self.row(id).is_none() {
            self.last_notice = Some(Notice::warning(format!("Assignment {id} not found")));
            return false;
        }
        self.editing = Some(id);
        true
    }

    pub async fn on_save_edit(&mut self, id: i64, patch: AssignmentUpdate) -> bool {
        if let Err(e) = patch.validate() {
            self.last_notice = Some(Notice::from_error(e));
            return false;
        }

        self.submitting = true;
        let result = self.assignments.update(id, &patch).await;
        self.submitting = false;

        match result {
            Ok(Some(_)) => {
                self.editing = None;
                self.last_notice = Some(Notice::success("Assignment updated"));
                self.refresh().await;
                true
            }
            Ok(None) => {
                self.editing = None;
                self.last_notice = Some(Notice::warning(format!(
                    "Assignment {id} no longer exists"
                )));
                self.refresh().await;
                false
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to update assignment");
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    pub fn on_cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn on_delete(&mut self, id: i64) -> bool {
        self.submitting = true;
        let result = self.assignments.delete(id).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                if self.editing == Some(id) {
                    self.editing = None;
                }
                self.last_notice = Some(Notice::success("Assignment deleted"));
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to delete assignment");
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }
}
