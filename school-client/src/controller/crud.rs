//! List / create / edit / delete controller for one table

use super::Notice;
use crate::repository::{Entity, Repository};
use shared::{StoreResult, Validate};

/// Controller behind a single-table management view
pub struct CrudController<E: Entity> {
    repo: Repository<E>,
    items: Vec<E>,
    loading: bool,
    editing: Option<i64>,
    submitting: bool,
    last_notice: Option<Notice>,
}

impl<E: Entity> CrudController<E> {
    pub fn new(repo: Repository<E>) -> Self {
        Self {
            repo,
            items: Vec::new(),
            loading: false,
            editing: None,
            submitting: false,
            last_notice: None,
        }
    }

    /// Current snapshot in list order
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Id of the row being edited
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Row being edited, as in the current snapshot
    pub fn editing_item(&self) -> Option<&E> {
        self.editing.and_then(|id| self.item(id))
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }

    /// Drop the last notice once shown
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.last_notice.take()
    }

    fn item(&self, id: i64) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Re-fetch the list; keeps the previous snapshot on failure
    pub async fn refresh(&mut self) -> bool {
        self.loading = true;
        let result = self.repo.list().await;
        self.loading = false;

        match result {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(e) => {
                tracing::error!(table = E::TABLE, error = %e, "Failed to load list");
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    /// Await a store call with `submitting` raised, logging a failure
    async fn submit<T>(
        &mut self,
        action: &str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        self.submitting = true;
        let result = call.await;
        self.submitting = false;

        if let Err(e) = &result {
            tracing::error!(table = E::TABLE, action, error = %e, "Mutation failed");
        }
        result
    }

    pub async fn on_create(&mut self, draft: E::Create) -> bool {
        if let Err(e) = draft.validate() {
            self.last_notice = Some(Notice::from_error(e));
            return false;
        }

        let repo = self.repo.clone();
        match self.submit("create", repo.create(&draft)).await {
            Ok(_) => {
                self.last_notice = Some(Notice::success(format!("{} created", E::LABEL)));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    /// Mark a row of the current snapshot for editing
    pub fn on_start_edit(&mut self, id: i64) -> bool {
        if self.item(id).is_none() {
            self.last_notice = Some(Notice::warning(format!("{} {id} not found", E::LABEL)));
            return false;
        }
        self.editing = Some(id);
        true
    }

    pub async fn on_save_edit(&mut self, id: i64, patch: E::Update) -> bool {
        if let Err(e) = patch.validate() {
            self.last_notice = Some(Notice::from_error(e));
            return false;
        }

        let repo = self.repo.clone();
        match self.submit("update", repo.update(id, &patch)).await {
            Ok(Some(_)) => {
                self.editing = None;
                self.last_notice = Some(Notice::success(format!("{} updated", E::LABEL)));
                self.refresh().await;
                true
            }
            Ok(None) => {
                self.editing = None;
                self.last_notice = Some(Notice::warning(format!(
                    "{} {id} no longer exists",
                    E::LABEL
                )));
                self.refresh().await;
                false
            }
            Err(e) => {
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }

    pub fn on_cancel_edit(&mut self) {
        self.editing = None;
    }

    pub async fn on_delete(&mut self, id: i64) -> bool {
        let repo = self.repo.clone();
        match self.submit("delete", repo.delete(id)).await {
            Ok(()) => {
                if self.editing == Some(id) {
                    self.editing = None;
                }
                self.last_notice = Some(Notice::success(format!("{} deleted", E::LABEL)));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.last_notice = Some(Notice::from_error(e));
                false
            }
        }
    }
}
