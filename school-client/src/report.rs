//! Report Gateway
//!
//! Server-side aggregate queries exposed by the store as remote
//! procedures: the per-job-title user report and the canned queries of the
//! console view.

use crate::store::{DataStore, MemoryStore, MemoryTables};
use serde::Serialize;
use serde_json::{Map, Value, json};
use shared::models::{ReportRow, ReportTable};
use shared::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Users-by-job-title procedure
pub const USERS_BY_JOB_TITLE_RPC: &str = "get_user_info_by_cargo";
/// Named parameter of [`USERS_BY_JOB_TITLE_RPC`]
pub const JOB_TITLE_PARAM: &str = "cargo_desc";

/// A parameterless procedure offered in the console view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CannedQuery {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub rpc: &'static str,
}

const CATALOG: &[CannedQuery] = &[
    CannedQuery {
        id: 1,
        name: "Users and their assigned job titles",
        description: "Every user together with the job title currently assigned to them.",
        rpc: "usuarios_con_cargo",
    },
    CannedQuery {
        id: 2,
        name: "Most frequent entry time",
        description: "The most common entry time across all schedules.",
        rpc: "hora_entrada_frecuente",
    },
];

impl CannedQuery {
    pub fn catalog() -> &'static [CannedQuery] {
        CATALOG
    }

    pub fn find(id: u32) -> Option<&'static CannedQuery> {
        CATALOG.iter().find(|q| q.id == id)
    }
}

/// RPC client for the report procedures
#[derive(Clone)]
pub struct ReportGateway {
    store: Arc<dyn DataStore>,
}

impl ReportGateway {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Users assigned to the job title `label`, with their schedule
    ///
    /// A blank label is rejected locally. An empty result is `Ok(vec![])`.
    pub async fn users_by_job_title(&self, label: &str) -> StoreResult<Vec<ReportRow>> {
        let label = label.trim();
        if label.is_empty() {
            return Err(StoreError::validation(
                "Select a job title before running the report",
            ));
        }

        let params = json!({ JOB_TITLE_PARAM: label });
        let result = self
            .store
            .rpc(USERS_BY_JOB_TITLE_RPC, params)
            .await
            .inspect_err(|e| tracing::warn!(label, error = %e, "Report failed"))?;

        let rows = rows_of(result)
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect::<StoreResult<Vec<ReportRow>>>()?;
        tracing::debug!(label, count = rows.len(), "Report rows received");
        Ok(rows)
    }

    /// Run a canned query and tabulate whatever it returns
    pub async fn run_canned(&self, query: &CannedQuery) -> StoreResult<ReportTable> {
        let result = self
            .store
            .rpc(query.rpc, Value::Object(Map::new()))
            .await
            .inspect_err(|e| tracing::warn!(rpc = query.rpc, error = %e, "Canned query failed"))?;
        Ok(table_from_rows(&rows_of(result)))
    }
}

/// Rows of an RPC result
///
/// A single object or scalar (a function returning one `time`, say) is one
/// row; null is no rows.
fn rows_of(result: Value) -> Vec<Value> {
    match result {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        single => vec![single],
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Tabulate untyped rows
///
/// Columns come from the first row's keys in order; headers show `_` as a
/// space. Rows that are not objects land in a single `value` column.
pub fn table_from_rows(rows: &[Value]) -> ReportTable {
    let Some(first) = rows.first() else {
        return ReportTable::default();
    };

    let Some(keys) = first.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()) else {
        return ReportTable {
            columns: vec!["value".to_string()],
            rows: rows.iter().map(|r| vec![cell(Some(r))]).collect(),
        };
    };

    ReportTable {
        columns: keys.iter().map(|k| k.replace('_', " ")).collect(),
        rows: rows
            .iter()
            .map(|row| keys.iter().map(|k| cell(row.get(k))).collect())
            .collect(),
    }
}

fn text<'a>(row: &'a Map<String, Value>, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

fn field(row: Option<&Map<String, Value>>, column: &str) -> Value {
    row.and_then(|r| r.get(column)).cloned().unwrap_or(Value::Null)
}

fn reference<'a>(
    tables: &'a MemoryTables,
    row: &Map<String, Value>,
    column: &str,
    table: &str,
) -> Option<&'a Map<String, Value>> {
    row.get(column)
        .and_then(Value::as_i64)
        .and_then(|id| tables.row(table, id))
}

fn users_by_job_title(tables: &MemoryTables, params: &Value) -> StoreResult<Value> {
    let label = params
        .get(JOB_TITLE_PARAM)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            StoreError::constraint(
                "PGRST202",
                format!(
                    "Could not find the function public.{USERS_BY_JOB_TITLE_RPC} without parameter {JOB_TITLE_PARAM}"
                ),
            )
        })?;

    let rows: Vec<Value> = tables
        .rows("usuarios_cargos")
        .into_iter()
        .filter(|a| {
            reference(tables, a, "id_cargo", "cargos")
                .and_then(|c| text(c, "cargo"))
                .is_some_and(|name| name == label)
        })
        .filter_map(|a| {
            let user = reference(tables, a, "id_usuario", "usuarios")?;
            let schedule = reference(tables, a, "id_horario", "horarios");
            Some(json!({
                "nombre": field(Some(user), "nombre"),
                "email": field(Some(user), "email"),
                "hora_ingreso": field(schedule, "hora_ingreso"),
                "hora_salida": field(schedule, "hora_salida"),
            }))
        })
        .collect();
    Ok(Value::Array(rows))
}

fn users_with_job_titles(tables: &MemoryTables, _: &Value) -> StoreResult<Value> {
    let rows: Vec<Value> = tables
        .rows("usuarios_cargos")
        .into_iter()
        .filter_map(|a| {
            let user = reference(tables, a, "id_usuario", "usuarios")?;
            let title = reference(tables, a, "id_cargo", "cargos")?;
            Some(json!({
                "nombre": field(Some(user), "nombre"),
                "email": field(Some(user), "email"),
                "cargo": field(Some(title), "cargo"),
                "fecha_asignacion": field(Some(a), "fecha_asignacion"),
            }))
        })
        .collect();
    Ok(Value::Array(rows))
}

fn most_frequent_entry_time(tables: &MemoryTables, _: &Value) -> StoreResult<Value> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for schedule in tables.rows("horarios") {
        if let Some(entry) = text(schedule, "hora_ingreso") {
            *counts.entry(entry).or_default() += 1;
        }
    }
    // Ties go to the earliest time
    let top = counts
        .into_iter()
        .max_by(|(ta, ca), (tb, cb)| ca.cmp(cb).then_with(|| tb.cmp(ta)));
    Ok(match top {
        Some((time, count)) => json!([{ "hora_ingreso": time, "frecuencia": count }]),
        None => json!([]),
    })
}

/// Install the school report procedures on an in-memory store
pub(crate) fn register_school_procedures(store: &MemoryStore) {
    store.register_rpc(USERS_BY_JOB_TITLE_RPC, users_by_job_title);
    store.register_rpc("usuarios_con_cargo", users_with_job_titles);
    store.register_rpc("hora_entrada_frecuente", most_frequent_entry_time);
}
