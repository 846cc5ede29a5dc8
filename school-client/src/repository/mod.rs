//! Repository Module
//!
//! One generic repository, instantiated per table. Each repository is
//! constructed with an explicit store handle; there is no process-wide
//! client.

pub mod assignment;
pub mod job_title;
pub mod schedule;
pub mod user;

// Re-exports
pub use assignment::{AssignmentListing, AssignmentRepository};
pub use job_title::JobTitleRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;

use crate::store::{DataStore, EqFilter, SelectQuery, SortDirection};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{StoreError, StoreResult, Validate};
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed table row
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    /// Store table name
    const TABLE: &'static str;
    /// Columns requested by `list()`
    const COLUMNS: &'static str = "*";
    /// Direction of the id ordering used by `list()`
    const ORDER: SortDirection;
    /// Human-readable name used in notices ("Job title", "User", ...)
    const LABEL: &'static str;

    /// Create payload
    type Create: Serialize + Validate + Send + Sync;
    /// Partial update payload
    type Update: Serialize + Validate + Send + Sync;

    fn id(&self) -> i64;
}

/// CRUD operations for one table
pub struct Repository<E> {
    store: Arc<dyn DataStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Store handle this repository was built with
    pub fn store(&self) -> &Arc<dyn DataStore> {
        &self.store
    }

    /// All rows ordered by id
    pub async fn list(&self) -> StoreResult<Vec<E>> {
        let query = SelectQuery::new(E::COLUMNS).order_by("id", E::ORDER);
        let rows = self
            .store
            .select(E::TABLE, &query)
            .await
            .inspect_err(|e| tracing::warn!(table = E::TABLE, error = %e, "List failed"))?;
        let items = decode_rows::<E>(rows)?;
        tracing::debug!(table = E::TABLE, count = items.len(), "Listed rows");
        Ok(items)
    }

    /// Row by id
    pub async fn find(&self, id: i64) -> StoreResult<Option<E>> {
        let query = SelectQuery::new(E::COLUMNS).filter(EqFilter::id(id));
        let rows = self.store.select(E::TABLE, &query).await?;
        first_row(rows)
    }

    /// Insert a row; returns exactly the inserted row
    ///
    /// The draft is forwarded as is; callers validate before dispatch.
    pub async fn create(&self, draft: &E::Create) -> StoreResult<E> {
        let payload = serde_json::to_value(draft)?;
        let rows = self
            .store
            .insert(E::TABLE, payload)
            .await
            .inspect_err(|e| tracing::warn!(table = E::TABLE, error = %e, "Create failed"))?;
        let created: E = first_row(rows)?
            .ok_or_else(|| StoreError::transport("store returned no inserted row"))?;
        tracing::info!(table = E::TABLE, id = created.id(), "Created row");
        Ok(created)
    }

    /// Patch the row with `id`
    ///
    /// `Ok(None)` when no row matched; that is not an error.
    pub async fn update(&self, id: i64, patch: &E::Update) -> StoreResult<Option<E>> {
        let payload = serde_json::to_value(patch)?;
        let rows = self
            .store
            .update(E::TABLE, &EqFilter::id(id), payload)
            .await
            .inspect_err(|e| tracing::warn!(table = E::TABLE, id, error = %e, "Update failed"))?;
        let updated = first_row(rows)?;
        if updated.is_none() {
            tracing::debug!(table = E::TABLE, id, "Update matched no row");
        }
        Ok(updated)
    }

    /// Delete the row with `id`
    ///
    /// Foreign key rejections come back as the store reported them.
    pub async fn delete(&self, id: i64) -> StoreResult<()> {
        self.store
            .delete(E::TABLE, &EqFilter::id(id))
            .await
            .inspect_err(|e| tracing::warn!(table = E::TABLE, id, error = %e, "Delete failed"))?;
        tracing::info!(table = E::TABLE, id, "Deleted row");
        Ok(())
    }
}

fn decode_rows<E: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Vec<E>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

fn first_row<E: DeserializeOwned>(rows: Vec<Value>) -> StoreResult<Option<E>> {
    rows.into_iter()
        .next()
        .map(serde_json::from_value)
        .transpose()
        .map_err(StoreError::from)
}
