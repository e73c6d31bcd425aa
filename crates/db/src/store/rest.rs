//! PostgREST-compatible client for the hosted store.
//!
//! Wraps the table endpoints (`GET`/`POST`/`PATCH`/`DELETE /{table}`) using
//! [`reqwest`]. Filters, ordering and joins are expressed as PostgREST query
//! parameters; writes ask for the stored row back with
//! `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use super::{check_columns, Filter, Order, RemoteStore, SelectQuery, StoreError};
use crate::mapper::Row;
use crate::schema::Table;

/// HTTP client for one hosted project.
pub struct RestStore {
    client: reqwest::Client,
    /// REST root, e.g. `https://project.example.co/rest/v1`.
    rest_url: String,
    api_key: String,
}

/// Error body returned by PostgREST for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl RestStore {
    /// Create a client with its own connection pool and request timeout.
    pub fn new(rest_url: String, api_key: String, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, rest_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, rest_url: String, api_key: String) -> Self {
        Self {
            client,
            rest_url: rest_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.rest_url, table.name())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, converting a PostgREST
    /// error body into [`StoreError::Rejected`].
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(rejection(status.as_u16(), &body))
    }

    /// Parse a successful response as a row set.
    async fn parse_rows(response: reqwest::Response) -> Result<Vec<Row>, StoreError> {
        let response = Self::ensure_success(response).await?;
        let value: Value = response.json().await?;
        rows_from_value(value)
    }
}

// ---------------------------------------------------------------------------
// Query parameter encoding
// ---------------------------------------------------------------------------

/// `select=` parameter: every column plus the table's joins, e.g.
/// `*,students!student_id(name)`.
pub fn select_param(table: Table) -> String {
    let mut select = String::from("*");
    for embed in table.embeds() {
        select.push_str(&format!(
            ",{}!{}({})",
            embed.relation.name(),
            embed.foreign_key,
            embed.columns.join(",")
        ));
    }
    select
}

/// Equality filter as a `(column, "eq.value")` pair; null becomes `is.null`.
pub fn filter_param(filter: &Filter) -> (String, String) {
    let predicate = match &filter.value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{s}"),
        other => format!("eq.{other}"),
    };
    (filter.column.to_string(), predicate)
}

/// `order=` parameter, e.g. `created_at.desc`.
pub fn order_param(order: &Order) -> String {
    let direction = if order.ascending { "asc" } else { "desc" };
    format!("{}.{direction}", order.column)
}

fn id_param(id: &str) -> (String, String) {
    ("id".to_string(), format!("eq.{id}"))
}

fn rejection(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => {
            let mut message = parsed.message.unwrap_or_else(|| body.to_string());
            if let Some(details) = parsed.details.filter(|d| !d.is_empty()) {
                message = format!("{message} ({details})");
            }
            if let Some(hint) = parsed.hint.filter(|h| !h.is_empty()) {
                tracing::debug!(status, hint = %hint, "Store rejection hint");
            }
            StoreError::Rejected {
                status,
                code: parsed.code,
                message,
            }
        }
        Err(_) => StoreError::Rejected {
            status,
            code: None,
            message: body.to_string(),
        },
    }
}

fn rows_from_value(value: Value) -> Result<Vec<Row>, StoreError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Decode(format!("expected a row object, got {other}"))),
            })
            .collect(),
        Value::Object(row) => Ok(vec![row]),
        other => Err(StoreError::Decode(format!("expected a row set, got {other}"))),
    }
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

#[async_trait]
impl RemoteStore for RestStore {
    fn backend(&self) -> &'static str {
        "rest"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        let mut params = vec![("select".to_string(), select_param(query.table))];
        if let Some(filter) = &query.filter {
            params.push(filter_param(filter));
        }
        if let Some(order) = &query.order {
            params.push(("order".to_string(), order_param(order)));
        }

        let response = self
            .request(Method::GET, self.table_url(query.table))
            .query(&params)
            .send()
            .await?;
        Self::parse_rows(response).await
    }

    async fn insert(&self, table: Table, row: &Row) -> Result<Row, StoreError> {
        check_columns(table, row)?;
        let response = self
            .request(Method::POST, self.table_url(table))
            .query(&[("select", select_param(table))])
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        Self::parse_rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    async fn update(
        &self,
        table: Table,
        id: &str,
        patch: &Row,
    ) -> Result<Option<Row>, StoreError> {
        check_columns(table, patch)?;
        let response = self
            .request(Method::PATCH, self.table_url(table))
            .query(&[id_param(id), ("select".to_string(), select_param(table))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Ok(Self::parse_rows(response).await?.into_iter().next())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<u64, StoreError> {
        let response = self
            .request(Method::DELETE, self.table_url(table))
            .query(&[id_param(id), ("select".to_string(), "id".to_string())])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        Ok(Self::parse_rows(response).await?.len() as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let response = self
            .request(Method::GET, format!("{}/", self.rest_url))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}
