//! In-memory store
//!
//! Emulates the hosted store's constraint behavior (not-null, unique,
//! foreign keys) and its RPC surface, so repositories, gateways and
//! controllers can be exercised without a network.

use super::{DataStore, EqFilter, SelectQuery, SortDirection};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use shared::error::sqlstate;
use shared::{StoreError, StoreResult};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize};

/// RPC handler: named parameters in, JSON result out
pub type RpcHandler = Arc<dyn Fn(&MemoryTables, &Value) -> StoreResult<Value> + Send + Sync>;

/// Foreign key: `column` references `table.id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: String,
    pub references: String,
}

/// Column constraints for one table
#[derive(Debug, Clone, Default)]
pub struct TableSchema {
    /// Non-null columns
    pub required: Vec<String>,
    /// Columns with a unique index
    pub unique: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Values filled in when an insert omits the column
    pub defaults: Vec<(String, Value)>,
}

impl TableSchema {
    pub fn required(mut self, columns: &[&str]) -> Self {
        self.required.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn unique(mut self, column: &str) -> Self {
        self.unique.push(column.to_string());
        self
    }

    pub fn foreign_key(mut self, column: &str, references: &str) -> Self {
        self.foreign_keys.push(ForeignKey {
            column: column.to_string(),
            references: references.to_string(),
        });
        self
    }

    pub fn default_value(mut self, column: &str, value: Value) -> Self {
        self.defaults.push((column.to_string(), value));
        self
    }
}

#[derive(Debug, Default)]
struct Table {
    schema: TableSchema,
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

/// Table contents visible to RPC handlers
#[derive(Debug, Default)]
pub struct MemoryTables {
    tables: HashMap<String, Table>,
}

impl MemoryTables {
    /// Rows of a table in id order (empty for unknown tables)
    pub fn rows(&self, table: &str) -> Vec<&Map<String, Value>> {
        self.tables
            .get(table)
            .map(|t| t.rows.values().collect())
            .unwrap_or_default()
    }

    /// Row by primary key
    pub fn row(&self, table: &str, id: i64) -> Option<&Map<String, Value>> {
        self.tables.get(table).and_then(|t| t.rows.get(&id))
    }

    fn table(&self, name: &str) -> StoreResult<&Table> {
        self.tables.get(name).ok_or_else(|| undefined_table(name))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut Table> {
        self.tables.get_mut(name).ok_or_else(|| undefined_table(name))
    }

    /// Check not-null, unique and outgoing foreign keys for a candidate row
    fn check_row(&self, table: &str, row: &Map<String, Value>, self_id: i64) -> StoreResult<()> {
        let schema = &self.table(table)?.schema;

        for column in &schema.required {
            if row.get(column).is_none_or(Value::is_null) {
                return Err(StoreError::constraint(
                    sqlstate::NOT_NULL_VIOLATION,
                    format!(
                        "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
                    ),
                ));
            }
        }

        for column in &schema.unique {
            let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let taken = self.table(table)?.rows.iter().any(|(id, other)| {
                *id != self_id && other.get(column) == Some(value)
            });
            if taken {
                return Err(StoreError::constraint(
                    sqlstate::UNIQUE_VIOLATION,
                    format!("duplicate key value violates unique constraint \"{table}_{column}_key\""),
                )
                .with_details(format!(
                    "Key ({column})=({}) already exists.",
                    display_value(value)
                )));
            }
        }

        for fk in &schema.foreign_keys {
            let Some(value) = row.get(&fk.column).filter(|v| !v.is_null()) else {
                continue;
            };
            let present = value
                .as_i64()
                .is_some_and(|id| self.row(&fk.references, id).is_some());
            if !present {
                return Err(StoreError::constraint(
                    sqlstate::FOREIGN_KEY_VIOLATION,
                    format!(
                        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{}_fkey\"",
                        fk.column
                    ),
                )
                .with_details(format!(
                    "Key ({})=({}) is not present in table \"{}\".",
                    fk.column,
                    display_value(value),
                    fk.references
                )));
            }
        }

        Ok(())
    }

    /// Reject deleting a row that another table still references
    fn check_not_referenced(&self, table: &str, id: i64) -> StoreResult<()> {
        for (name, other) in &self.tables {
            for fk in other.schema.foreign_keys.iter().filter(|fk| fk.references == table) {
                let referenced = other
                    .rows
                    .values()
                    .any(|row| row.get(&fk.column).and_then(Value::as_i64) == Some(id));
                if referenced {
                    return Err(StoreError::constraint(
                        sqlstate::FOREIGN_KEY_VIOLATION,
                        format!(
                            "update or delete on table \"{table}\" violates foreign key constraint \"{name}_{}_fkey\" on table \"{name}\"",
                            fk.column
                        ),
                    )
                    .with_details(format!(
                        "Key (id)=({id}) is still referenced from table \"{name}\"."
                    )));
                }
            }
        }
        Ok(())
    }
}

fn undefined_table(name: &str) -> StoreError {
    StoreError::constraint("42P01", format!("relation \"public.{name}\" does not exist"))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn project(row: &Map<String, Value>, columns: &str) -> Value {
    let wanted: Vec<&str> = columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if wanted.is_empty() || wanted.contains(&"*") {
        return Value::Object(row.clone());
    }
    Value::Object(
        wanted
            .into_iter()
            .filter_map(|c| row.get(c).map(|v| (c.to_string(), v.clone())))
            .collect(),
    )
}

/// In-memory [`DataStore`]
pub struct MemoryStore {
    tables: Mutex<MemoryTables>,
    rpc: RwLock<HashMap<String, RpcHandler>>,
    rpc_calls: AtomicUsize,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Empty store without tables
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(MemoryTables::default()),
            rpc: RwLock::new(HashMap::new()),
            rpc_calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Store with the school schema and its report procedures
    pub fn school() -> Self {
        let store = Self::new();
        store.define_table(
            "cargos",
            TableSchema::default()
                .required(&["cargo"])
                .default_value("sueldo", Value::from(0)),
        );
        store.define_table(
            "usuarios",
            TableSchema::default()
                .required(&["nombre", "email"])
                .unique("email")
                .default_value("telefono", Value::Null),
        );
        store.define_table(
            "horarios",
            TableSchema::default().required(&["hora_ingreso", "hora_salida"]),
        );
        store.define_table(
            "usuarios_cargos",
            TableSchema::default()
                .required(&["id_usuario", "id_cargo", "fecha_asignacion"])
                .foreign_key("id_usuario", "usuarios")
                .foreign_key("id_cargo", "cargos")
                .foreign_key("id_horario", "horarios")
                .default_value("id_horario", Value::Null),
        );
        crate::report::register_school_procedures(&store);
        store
    }

    /// Create (or replace) a table
    pub fn define_table(&self, name: &str, schema: TableSchema) {
        self.tables.lock().tables.insert(
            name.to_string(),
            Table {
                schema,
                next_id: 1,
                rows: BTreeMap::new(),
            },
        );
    }

    /// Register a remote procedure
    pub fn register_rpc<F>(&self, name: &str, handler: F)
    where
        F: Fn(&MemoryTables, &Value) -> StoreResult<Value> + Send + Sync + 'static,
    {
        self.rpc.write().insert(name.to_string(), Arc::new(handler));
    }

    /// Number of RPC calls dispatched so far
    pub fn rpc_calls(&self) -> usize {
        self.rpc_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Simulate losing the connection: every call fails with a transport error
    pub fn set_offline(&self, offline: bool) {
        self.offline
            .store(offline, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of rows currently stored in `table`
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.lock().rows(table).len()
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.offline.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::transport("Could not connect to the store"));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("tables", &self.tables.lock().tables.keys().collect::<Vec<_>>())
            .field("rpc", &self.rpc.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn as_object(value: Value, what: &str) -> StoreResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::rejection(format!(
            "{what} must be a JSON object, got {other}"
        ))),
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> StoreResult<Vec<Value>> {
        self.ensure_online()?;
        let tables = self.tables.lock();
        let mut rows: Vec<&Map<String, Value>> = tables
            .table(table)?
            .rows
            .values()
            .filter(|row| {
                let value = Value::Object((*row).clone());
                query.filters.iter().all(|f| f.matches(&value))
            })
            .collect();

        if let Some((column, direction)) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(column), b.get(column));
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        Ok(rows.into_iter().map(|r| project(r, &query.columns)).collect())
    }

    async fn insert(&self, table: &str, row: Value) -> StoreResult<Vec<Value>> {
        self.ensure_online()?;
        let mut row = as_object(row, "inserted row")?;
        let mut tables = self.tables.lock();

        let id = {
            let t = tables.table(table)?;
            for (column, value) in &t.schema.defaults {
                row.entry(column.clone()).or_insert_with(|| value.clone());
            }
            t.next_id
        };
        row.insert("id".to_string(), Value::from(id));
        tables.check_row(table, &row, id)?;

        let t = tables.table_mut(table)?;
        t.next_id += 1;
        t.rows.insert(id, row.clone());
        tracing::trace!(table, id, "Inserted row");
        Ok(vec![Value::Object(row)])
    }

    async fn update(
        &self,
        table: &str,
        filter: &EqFilter,
        patch: Value,
    ) -> StoreResult<Vec<Value>> {
        self.ensure_online()?;
        let patch = as_object(patch, "update patch")?;
        let mut tables = self.tables.lock();

        let candidates: Vec<(i64, Map<String, Value>)> = tables
            .table(table)?
            .rows
            .iter()
            .filter(|(_, row)| filter.matches(&Value::Object((*row).clone())))
            .map(|(id, row)| {
                let mut merged = row.clone();
                for (k, v) in &patch {
                    if k != "id" {
                        merged.insert(k.clone(), v.clone());
                    }
                }
                (*id, merged)
            })
            .collect();

        // All-or-nothing: check every candidate before writing any
        for (id, row) in &candidates {
            tables.check_row(table, row, *id)?;
        }

        let t = tables.table_mut(table)?;
        let mut updated = Vec::with_capacity(candidates.len());
        for (id, row) in candidates {
            t.rows.insert(id, row.clone());
            updated.push(Value::Object(row));
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &EqFilter) -> StoreResult<()> {
        self.ensure_online()?;
        let mut tables = self.tables.lock();

        let ids: Vec<i64> = tables
            .table(table)?
            .rows
            .iter()
            .filter(|(_, row)| filter.matches(&Value::Object((*row).clone())))
            .map(|(id, _)| *id)
            .collect();

        for id in &ids {
            tables.check_not_referenced(table, *id)?;
        }

        let t = tables.table_mut(table)?;
        for id in ids {
            t.rows.remove(&id);
        }
        Ok(())
    }

    async fn rpc(&self, function: &str, params: Value) -> StoreResult<Value> {
        self.ensure_online()?;
        self.rpc_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let handler = self.rpc.read().get(function).cloned().ok_or_else(|| {
            StoreError::constraint(
                "PGRST202",
                format!("Could not find the function public.{function} in the schema cache"),
            )
        })?;
        let tables = self.tables.lock();
        handler(&*tables, &params)
    }
}
