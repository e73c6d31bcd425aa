//! In-process [`RemoteStore`] for tests and offline demos.
//!
//! Behaves like the hosted store where the console can observe it: ids and
//! `created_at` are generated, required and unknown columns are rejected,
//! joins are resolved, and ordering puts nulls last on ascending sorts.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{check_columns, RemoteStore, SelectQuery, StoreError};
use crate::mapper::{self, Row};
use crate::schema::Table;

/// Tables held in memory behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, Vec<Row>>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a network outage: every call fails as unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Number of store calls made so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Load rows directly, bypassing constraint checks.
    pub async fn seed(&self, table: Table, rows: Vec<Row>) {
        self.tables.write().await.entry(table).or_default().extend(rows);
    }

    /// Raw rows of a table as stored, without joins.
    pub async fn rows(&self, table: Table) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    fn begin_call(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn row_id(row: &Row) -> String {
    mapper::text(row, "id")
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Ascending comparison with nulls sorting after every value.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn violation(table: Table, column: &str) -> StoreError {
    StoreError::Rejected {
        status: 400,
        code: Some("23502".to_string()),
        message: format!(
            "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
        ),
    }
}

fn check_required(table: Table, row: &Row) -> Result<(), StoreError> {
    match table
        .required()
        .iter()
        .find(|c| row.get(**c).map_or(true, Value::is_null))
    {
        Some(column) => Err(violation(table, column)),
        None => Ok(()),
    }
}

/// Attach the table's joined relations to a copy of `row`.
fn with_embeds(tables: &HashMap<Table, Vec<Row>>, table: Table, row: &Row) -> Row {
    let mut out = row.clone();
    for embed in table.embeds() {
        let key = mapper::text(row, embed.foreign_key);
        let related = tables
            .get(&embed.relation)
            .and_then(|rows| rows.iter().find(|r| !key.is_empty() && row_id(r) == key))
            .map(|r| {
                let projected: Row = embed
                    .columns
                    .iter()
                    .map(|c| (c.to_string(), r.get(*c).cloned().unwrap_or(Value::Null)))
                    .collect();
                Value::Object(projected)
            })
            .unwrap_or(Value::Null);
        out.insert(embed.relation.name().to_string(), related);
    }
    out
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

#[async_trait]
impl RemoteStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        self.begin_call()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<&Row> = tables
            .get(&query.table)
            .map(|rows| rows.iter().collect())
            .unwrap_or_default();

        if let Some(filter) = &query.filter {
            rows.retain(|r| {
                r.get(filter.column)
                    .map_or(filter.value.is_null(), |v| values_equal(v, &filter.value))
            });
        }

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(order.column), b.get(order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        Ok(rows
            .into_iter()
            .map(|r| with_embeds(&tables, query.table, r))
            .collect())
    }

    async fn insert(&self, table: Table, row: &Row) -> Result<Row, StoreError> {
        self.begin_call()?;
        check_columns(table, row)?;

        let mut stored = row.clone();
        if row_id(&stored).is_empty() {
            stored.insert("id".to_string(), Value::from(uuid::Uuid::new_v4().to_string()));
        }
        if stored.get("created_at").map_or(true, Value::is_null) {
            stored.insert(
                "created_at".to_string(),
                Value::from(mapper::format_timestamp(&Utc::now())),
            );
        }
        check_required(table, &stored)?;

        let mut tables = self.tables.write().await;
        let id = row_id(&stored);
        let rows = tables.entry(table).or_default();
        if rows.iter().any(|r| row_id(r) == id) {
            return Err(StoreError::Rejected {
                status: 409,
                code: Some("23505".to_string()),
                message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
            });
        }
        rows.push(stored.clone());
        Ok(with_embeds(&tables, table, &stored))
    }

    async fn update(
        &self,
        table: Table,
        id: &str,
        patch: &Row,
    ) -> Result<Option<Row>, StoreError> {
        self.begin_call()?;
        check_columns(table, patch)?;

        let mut tables = self.tables.write().await;
        let Some(existing) = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == id))
        else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        for (column, value) in patch {
            updated.insert(column.clone(), value.clone());
        }
        check_required(table, &updated)?;
        *existing = updated.clone();

        Ok(Some(with_embeds(&tables, table, &updated)))
    }

    async fn delete(&self, table: Table, id: &str) -> Result<u64, StoreError> {
        self.begin_call()?;
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(&table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| row_id(r) != id);
        Ok((before - rows.len()) as u64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.begin_call()
    }
}
