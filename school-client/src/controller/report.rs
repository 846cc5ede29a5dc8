//! Report view controller

use super::{ComboOption, Notice, options};
use crate::report::ReportGateway;
use crate::repository::JobTitleRepository;
use crate::store::DataStore;
use shared::StoreError;
use shared::models::ReportRow;
use std::sync::Arc;

const NO_RESULTS: &str = "No users found for this job title";

/// Job title picker and the rows of the last run
pub struct ReportController {
    gateway: ReportGateway,
    job_titles: JobTitleRepository,

    options: Vec<ComboOption>,
    selected: Option<String>,
    rows: Vec<ReportRow>,
    running: bool,
    last_notice: Option<Notice>,
}

impl ReportController {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            gateway: ReportGateway::new(Arc::clone(&store)),
            job_titles: JobTitleRepository::new(store),
            options: Vec::new(),
            selected: None,
            rows: Vec::new(),
            running: false,
            last_notice: None,
        }
    }

    pub fn options(&self) -> &[ComboOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    /// Load the job titles offered in the picker
    pub async fn load_options(&mut self) -> bool {
        match self.job_titles.list().await {
            Ok(job_titles) => {
                self.options = options(&job_titles);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load job titles");
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    /// Select a job title by label; blank clears the selection
    pub fn select(&mut self, label: impl Into<String>) {
        let label = label.into();
        self.selected = (!label.trim().is_empty()).then_some(label);
    }

    pub async fn run(&mut self) -> bool {
        let Some(label) = self.selected.clone() else {
            self.last_notice = Some(Notice::from_error(StoreError::validation(
                "Select a job title before running the report",
            )));
            return false;
        };

        self.running = true;
        let result = self.gateway.users_by_job_title(&label).await;
        self.running = false;

        match result {
            Ok(rows) => {
                self.last_notice = rows.is_empty().then(|| Notice::info(NO_RESULTS));
                self.rows = rows;
                true
            }
            Err(e) => {
                tracing::error!(label = %label, error = %e, "Report failed");
                self.rows.clear();
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeLevel;
    use crate::store::MemoryStore;
    use serde_json::json;

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::school());
        store.insert("cargos", json!({"cargo": "Teacher"})).await.unwrap();
        store.insert("cargos", json!({"cargo": "Janitor"})).await.unwrap();
        store
            .insert("usuarios", json!({"nombre": "Ana", "email": "ana@school.test"}))
            .await
            .unwrap();
        store
            .insert(
                "usuarios_cargos",
                json!({"id_usuario": 1, "id_cargo": 1, "fecha_asignacion": "2024-09-02"}),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_run_without_selection() {
        let store = seeded().await;
        let mut ctrl = ReportController::new(store.clone());
        ctrl.select("   ");
        assert!(!ctrl.run().await);
        assert_eq!(ctrl.last_notice().unwrap().level, NoticeLevel::Warning);
        assert_eq!(store.rpc_calls(), 0);
    }

    #[tokio::test]
    async fn test_run_with_results_and_empty() {
        let mut ctrl = ReportController::new(seeded().await);
        assert!(ctrl.load_options().await);
        assert_eq!(ctrl.options().len(), 2);

        ctrl.select("Teacher");
        assert!(ctrl.run().await);
        assert_eq!(ctrl.rows().len(), 1);
        assert_eq!(ctrl.rows()[0].entry_display(), "N/A");
        assert!(ctrl.last_notice().is_none());

        ctrl.select("Janitor");
        assert!(ctrl.run().await);
        assert!(ctrl.rows().is_empty());
        let notice = ctrl.last_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "No users found for this job title");
    }

    #[tokio::test]
    async fn test_failure_clears_rows() {
        let store = seeded().await;
        let mut ctrl = ReportController::new(store.clone());
        ctrl.select("Teacher");
        ctrl.run().await;
        assert_eq!(ctrl.rows().len(), 1);

        store.set_offline(true);
        assert!(!ctrl.run().await);
        assert!(ctrl.rows().is_empty());
        assert_eq!(ctrl.last_notice().unwrap().level, NoticeLevel::Error);
    }
}
