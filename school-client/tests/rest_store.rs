// school-client/tests/rest_store.rs
// RestStore against a local HTTP server speaking the store's REST dialect

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use school_client::{
    AssignmentRepository, ClientConfig, DataStore, EqFilter, JobTitleRepository, MemoryStore,
    ReportGateway, RestStore, ScheduleRepository, SelectQuery, SortDirection, UserRepository,
};
use serde_json::{Value, json};
use shared::StoreError;
use shared::models::{AssignmentCreate, JobTitleCreate, JobTitleUpdate, ScheduleCreate, UserCreate};
use std::sync::Arc;

const API_KEY: &str = "anon-key";

#[derive(Clone)]
struct Backend {
    store: Arc<MemoryStore>,
    auth: Arc<Mutex<Vec<String>>>,
}

type Params = Query<Vec<(String, String)>>;

fn error_response(err: StoreError) -> Response {
    let status = match err.code.as_deref() {
        Some(code) if code.starts_with("23") => StatusCode::CONFLICT,
        Some("42P01") | Some("PGRST202") => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    let body = json!({
        "code": err.code,
        "message": err.message,
        "details": err.details,
        "hint": err.hint,
    });
    (status, Json(body)).into_response()
}

fn check_key(backend: &Backend, headers: &HeaderMap) -> Result<(), Response> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        backend.auth.lock().push(auth.to_string());
    }
    match headers.get("apikey").and_then(|v| v.to_str().ok()) {
        Some(API_KEY) => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid API key"})),
        )
            .into_response()),
    }
}

fn parse_query(params: &[(String, String)]) -> SelectQuery {
    let mut query = SelectQuery::all();
    for (key, value) in params {
        match key.as_str() {
            "select" => query.columns = value.clone(),
            "order" => {
                let (column, dir) = value.split_once('.').unwrap_or((value.as_str(), "asc"));
                let dir = if dir == "desc" {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                query = query.order_by(column, dir);
            }
            column => {
                let value = value.strip_prefix("eq.").unwrap_or(value.as_str());
                query = query.filter(EqFilter::new(column, value));
            }
        }
    }
    query
}

fn only_filter(params: &[(String, String)]) -> EqFilter {
    let query = parse_query(params);
    query.filters.into_iter().next().unwrap_or_else(|| EqFilter::new("id", "-1"))
}

async fn select_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_key(&backend, &headers) {
        return r;
    }
    match backend.store.select(&table, &parse_query(&params)).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(e),
    }
}

async fn insert_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = check_key(&backend, &headers) {
        return r;
    }
    let rows = match body {
        Value::Array(rows) => rows,
        other => vec![other],
    };
    let mut inserted = Vec::new();
    for row in rows {
        match backend.store.insert(&table, row).await {
            Ok(mut r) => inserted.append(&mut r),
            Err(e) => return error_response(e),
        }
    }
    if headers.get("prefer").and_then(|v| v.to_str().ok()) == Some("return=representation") {
        (StatusCode::CREATED, Json(inserted)).into_response()
    } else {
        StatusCode::CREATED.into_response()
    }
}

async fn update_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
    Json(patch): Json<Value>,
) -> Response {
    if let Err(r) = check_key(&backend, &headers) {
        return r;
    }
    match backend.store.update(&table, &only_filter(&params), patch).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_rows(
    State(backend): State<Backend>,
    Path(table): Path<String>,
    Query(params): Params,
    headers: HeaderMap,
) -> Response {
    if let Err(r) = check_key(&backend, &headers) {
        return r;
    }
    match backend.store.delete(&table, &only_filter(&params)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn call_rpc(
    State(backend): State<Backend>,
    Path(function): Path<String>,
    headers: HeaderMap,
    Json(params): Json<Value>,
) -> Response {
    if let Err(r) = check_key(&backend, &headers) {
        return r;
    }
    match backend.store.rpc(&function, params).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(e),
    }
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend {
        store: Arc::new(MemoryStore::school()),
        auth: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/rest/v1/rpc/{function}", post(call_rpc))
        .route(
            "/rest/v1/{table}",
            get(select_rows)
                .post(insert_rows)
                .patch(update_rows)
                .delete(delete_rows),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), backend)
}

fn rest_store(url: &str) -> Arc<dyn DataStore> {
    let config = ClientConfig::new(url).with_api_key(API_KEY);
    Arc::new(RestStore::new(&config).unwrap())
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
}

#[tokio::test]
async fn test_job_title_lifecycle_over_http() {
    let (url, backend) = spawn_backend().await;
    let repo = JobTitleRepository::new(rest_store(&url));

    let created = repo
        .create(&JobTitleCreate::new("Developer").with_base_salary(Decimal::new(300000, 2)))
        .await
        .unwrap();
    assert_eq!(created.id, 1);

    let patch = JobTitleUpdate {
        base_salary: Some(Decimal::new(350000, 2)),
        ..Default::default()
    };
    let updated = repo.update(created.id, &patch).await.unwrap().unwrap();
    assert_eq!(updated.name, "Developer");
    assert_eq!(updated.base_salary, Decimal::new(3500, 0));
    assert!(repo.update(77, &patch).await.unwrap().is_none());

    repo.delete(created.id).await.unwrap();
    assert!(repo.list().await.unwrap().is_empty());

    let auth = backend.auth.lock();
    assert!(!auth.is_empty());
    assert!(auth.iter().all(|a| a == "Bearer anon-key"));
}

#[tokio::test]
async fn test_ordering_over_http() {
    let (url, _) = spawn_backend().await;
    let store = rest_store(&url);
    let users = UserRepository::new(Arc::clone(&store));
    let schedules = ScheduleRepository::new(store);

    for (name, email) in [("Ana", "ana@school.test"), ("Luis", "luis@school.test")] {
        users.create(&UserCreate::new(name, email)).await.unwrap();
    }
    for (entry, exit) in [("07:00", "15:00"), ("08:00", "17:00")] {
        schedules
            .create(&ScheduleCreate::parse(entry, exit).unwrap())
            .await
            .unwrap();
    }

    let names: Vec<String> = users.list().await.unwrap().into_iter().map(|u| u.full_name).collect();
    assert_eq!(names, vec!["Luis", "Ana"]);
    let labels: Vec<String> = schedules.list().await.unwrap().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec!["07:00 - 15:00", "08:00 - 17:00"]);
}

#[tokio::test]
async fn test_rejections_are_verbatim() {
    let (url, _) = spawn_backend().await;
    let store = rest_store(&url);
    let users = UserRepository::new(Arc::clone(&store));
    let titles = JobTitleRepository::new(Arc::clone(&store));
    let assignments = AssignmentRepository::new(store);

    let ana = users.create(&UserCreate::new("Ana", "ana@school.test")).await.unwrap();
    let err = users
        .create(&UserCreate::new("Ana B", "ana@school.test"))
        .await
        .unwrap_err();
    assert!(err.is_rejection());
    assert!(err.is_unique_violation());
    assert_eq!(
        err.message,
        "duplicate key value violates unique constraint \"usuarios_email_key\""
    );

    let teacher = titles.create(&JobTitleCreate::new("Teacher")).await.unwrap();
    assignments
        .create(&AssignmentCreate::new(ana.id, teacher.id, day()))
        .await
        .unwrap();

    let err = titles.delete(teacher.id).await.unwrap_err();
    assert!(err.is_foreign_key_violation());
    assert!(err.details.as_deref().unwrap_or_default().contains("still referenced"));
    assert_eq!(titles.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_report_over_http() {
    let (url, _) = spawn_backend().await;
    let store = rest_store(&url);
    let users = UserRepository::new(Arc::clone(&store));
    let titles = JobTitleRepository::new(Arc::clone(&store));
    let assignments = AssignmentRepository::new(Arc::clone(&store));
    let gateway = ReportGateway::new(store);

    let ana = users.create(&UserCreate::new("Ana", "ana@school.test")).await.unwrap();
    let teacher = titles.create(&JobTitleCreate::new("Teacher")).await.unwrap();
    assignments
        .create(&AssignmentCreate::new(ana.id, teacher.id, day()))
        .await
        .unwrap();

    let rows = gateway.users_by_job_title("Teacher").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, "ana@school.test");
    assert!(gateway.users_by_job_title("Principal").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bad_key_is_rejection() {
    let (url, _) = spawn_backend().await;
    let config = ClientConfig::new(url).with_api_key("wrong");
    let repo = JobTitleRepository::new(Arc::new(RestStore::new(&config).unwrap()));
    let err = repo.list().await.unwrap_err();
    assert!(err.is_rejection());
    assert_eq!(err.message, "Invalid API key");
    assert_eq!(err.code.as_deref(), Some("401"));
}

#[tokio::test]
async fn test_unreachable_store_is_transport() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let repo = JobTitleRepository::new(rest_store(&format!("http://{addr}")));
    let err = repo.list().await.unwrap_err();
    assert!(err.is_transport());
}
