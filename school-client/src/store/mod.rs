//! Remote data store boundary
//!
//! [`DataStore`] is the only seam between repositories and the hosted
//! database. Rows travel as JSON objects; repositories decode them into
//! typed models.

mod memory;
mod rest;

pub use memory::{ForeignKey, MemoryStore, MemoryTables, RpcHandler, TableSchema};
pub use rest::RestStore;

use async_trait::async_trait;
use serde_json::Value;
use shared::StoreResult;

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Query-string suffix (`asc` / `desc`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Equality filter (`column = value`)
#[derive(Debug, Clone, PartialEq)]
pub struct EqFilter {
    pub column: String,
    pub value: Value,
}

impl EqFilter {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Filter on the primary key
    pub fn id(id: i64) -> Self {
        Self::new("id", id)
    }

    /// Value as it appears in a query string
    pub fn value_text(&self) -> String {
        scalar_text(&self.value)
    }

    /// Whether a row satisfies this filter
    pub fn matches(&self, row: &Value) -> bool {
        row.get(&self.column)
            .is_some_and(|v| scalar_text(v) == self.value_text())
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Select query: projected columns, optional ordering, equality filters
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Comma-separated column list or `*`
    pub columns: String,
    pub order: Option<(String, SortDirection)>,
    pub filters: Vec<EqFilter>,
}

impl SelectQuery {
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            order: None,
            filters: Vec::new(),
        }
    }

    /// Select every column
    pub fn all() -> Self {
        Self::new("*")
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    pub fn filter(mut self, filter: EqFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

/// Query / mutation / RPC surface of the hosted store
///
/// Implementations never panic on store failures; every failure is a
/// [`shared::StoreError`].
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Rows of `table` matching the query
    async fn select(&self, table: &str, query: &SelectQuery) -> StoreResult<Vec<Value>>;

    /// Insert one row; returns the inserted rows as stored
    async fn insert(&self, table: &str, row: Value) -> StoreResult<Vec<Value>>;

    /// Patch rows matching `filter`; returns the affected rows (possibly none)
    async fn update(&self, table: &str, filter: &EqFilter, patch: Value)
    -> StoreResult<Vec<Value>>;

    /// Delete rows matching `filter`
    async fn delete(&self, table: &str, filter: &EqFilter) -> StoreResult<()>;

    /// Invoke a remote procedure with named parameters
    async fn rpc(&self, function: &str, params: Value) -> StoreResult<Value>;
}
