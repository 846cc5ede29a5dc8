//! REST store - hosted database over HTTP
//!
//! Table operations map onto the store's REST dialect:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | select | `GET /rest/v1/{table}?select=..&order=id.desc&col=eq.v` |
//! | insert | `POST /rest/v1/{table}` + `Prefer: return=representation` |
//! | update | `PATCH /rest/v1/{table}?id=eq.N` + `Prefer: return=representation` |
//! | delete | `DELETE /rest/v1/{table}?id=eq.N` |
//! | rpc | `POST /rest/v1/rpc/{function}` with named parameters as JSON |

use super::{DataStore, EqFilter, SelectQuery};
use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use shared::StoreResult;

const REST_PREFIX: &str = "rest/v1";
const RETURN_REPRESENTATION: &str = "return=representation";

/// HTTP store client
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl RestStore {
    /// Create a new store client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: config.token.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/{}/rpc/{}", self.base_url, REST_PREFIX, function)
    }

    /// Build authorization header value (user token, else the API key)
    fn auth_header(&self) -> Option<String> {
        self.token
            .as_deref()
            .or((!self.api_key.is_empty()).then_some(self.api_key.as_str()))
            .map(|t| format!("Bearer {}", t))
    }

    fn authorize(&self, mut req: RequestBuilder) -> RequestBuilder {
        if !self.api_key.is_empty() {
            req = req.header("apikey", &self.api_key);
        }
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<Value> {
        let response = self.authorize(req).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Error bodies are kept as JSON when they parse, else as the raw text.
    async fn handle_response(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let body = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).unwrap_or(Value::String(text))
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(Into::into)
    }
}

/// Query-string pairs for a select
pub(crate) fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), compact_columns(&query.columns))];
    if let Some((column, direction)) = &query.order {
        params.push(("order".to_string(), format!("{}.{}", column, direction.as_str())));
    }
    params.extend(query.filters.iter().map(filter_param));
    params
}

pub(crate) fn filter_param(filter: &EqFilter) -> (String, String) {
    (filter.column.clone(), format!("eq.{}", filter.value_text()))
}

fn compact_columns(columns: &str) -> String {
    columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Rows from a representation body (array, single object, or nothing)
fn into_rows(body: Value) -> ClientResult<Vec<Value>> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(ClientError::InvalidResponse(format!(
            "expected rows, got {other}"
        ))),
    }
}

#[async_trait]
impl DataStore for RestStore {
    async fn select(&self, table: &str, query: &SelectQuery) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, columns = %query.columns, "GET rows");
        let req = self
            .client
            .get(self.table_url(table))
            .query(&select_params(query));
        let body = self.send(req).await?;
        Ok(into_rows(body)?)
    }

    async fn insert(&self, table: &str, row: Value) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, "POST row");
        let req = self
            .client
            .post(self.table_url(table))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&Value::Array(vec![row]));
        let body = self.send(req).await?;
        Ok(into_rows(body)?)
    }

    async fn update(
        &self,
        table: &str,
        filter: &EqFilter,
        patch: Value,
    ) -> StoreResult<Vec<Value>> {
        tracing::debug!(table, column = %filter.column, value = %filter.value_text(), "PATCH rows");
        let req = self
            .client
            .patch(self.table_url(table))
            .query(&[filter_param(filter)])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch);
        let body = self.send(req).await?;
        Ok(into_rows(body)?)
    }

    async fn delete(&self, table: &str, filter: &EqFilter) -> StoreResult<()> {
        tracing::debug!(table, column = %filter.column, value = %filter.value_text(), "DELETE rows");
        let req = self
            .client
            .delete(self.table_url(table))
            .query(&[filter_param(filter)]);
        self.send(req).await?;
        Ok(())
    }

    async fn rpc(&self, function: &str, params: Value) -> StoreResult<Value> {
        tracing::debug!(function, "POST rpc");
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        let req = self.client.post(self.rpc_url(function)).json(&params);
        Ok(self.send(req).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortDirection;
    use serde_json::json;

    #[test]
    fn test_urls_trim_trailing_slash() {
        let store = RestStore::new(&ClientConfig::new("https://school.example.co/")).unwrap();
        assert_eq!(store.base_url(), "https://school.example.co");
        assert_eq!(store.table_url("cargos"), "https://school.example.co/rest/v1/cargos");
        assert_eq!(
            store.rpc_url("get_user_info_by_cargo"),
            "https://school.example.co/rest/v1/rpc/get_user_info_by_cargo"
        );
    }

    #[test]
    fn test_select_params() {
        let query = SelectQuery::new("id, hora_ingreso, hora_salida")
            .order_by("id", SortDirection::Ascending)
            .filter(EqFilter::id(3));
        assert_eq!(
            select_params(&query),
            vec![
                ("select".to_string(), "id,hora_ingreso,hora_salida".to_string()),
                ("order".to_string(), "id.asc".to_string()),
                ("id".to_string(), "eq.3".to_string()),
            ]
        );
    }

    #[test]
    fn test_auth_header_prefers_token() {
        let config = ClientConfig::new("http://localhost:54321").with_api_key("anon");
        let store = RestStore::new(&config).unwrap();
        assert_eq!(store.auth_header().as_deref(), Some("Bearer anon"));

        let store = RestStore::new(&config.with_token("jwt")).unwrap();
        assert_eq!(store.auth_header().as_deref(), Some("Bearer jwt"));

        let store = RestStore::new(&ClientConfig::default()).unwrap();
        assert!(store.auth_header().is_none());
    }

    #[test]
    fn test_into_rows_shapes() {
        assert_eq!(into_rows(json!([{"id": 1}])).unwrap().len(), 1);
        assert_eq!(into_rows(json!({"id": 1})).unwrap().len(), 1);
        assert!(into_rows(Value::Null).unwrap().is_empty());
        assert!(into_rows(json!(42)).is_err());
    }
}
