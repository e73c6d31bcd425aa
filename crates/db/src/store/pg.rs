//! Direct Postgres backend over an sqlx pool.
//!
//! Rows travel as `jsonb` in both directions: selects project
//! `to_jsonb(t.*)` merged with the table's joins, and writes decode the
//! incoming [`Row`] with `jsonb_populate_record`. Identifiers only ever come
//! from [`Table`], and row keys are checked against it before any SQL is
//! built.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{check_columns, RemoteStore, SelectQuery, StoreError};
use crate::mapper::Row;
use crate::schema::Table;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    async fn fetch_rows(&self, sql: &str, binds: Vec<Value>) -> Result<Vec<Row>, StoreError> {
        let mut query = sqlx::query_scalar::<_, Json<Value>>(sql);
        for bind in binds {
            query = query.bind(Json(bind));
        }
        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|Json(value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(StoreError::Decode(format!("expected a row object, got {other}"))),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SQL builders
// ---------------------------------------------------------------------------

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `jsonb` expression for a row of `table` aliased `t`, joins included.
pub fn projection(table: Table) -> String {
    let mut expr = String::from("to_jsonb(t.*)");
    for (i, embed) in table.embeds().iter().enumerate() {
        let alias = format!("j{i}");
        let fields = embed
            .columns
            .iter()
            .map(|c| format!("'{c}', {alias}.{}", quote(c)))
            .collect::<Vec<_>>()
            .join(", ");
        expr.push_str(&format!(
            " || jsonb_build_object('{rel}', (SELECT jsonb_build_object({fields}) FROM {rel} {alias} WHERE {alias}.id = t.{fk}))",
            rel = embed.relation.name(),
            fk = quote(embed.foreign_key),
        ));
    }
    expr
}

/// Select statement and its bind values.
pub fn select_sql(query: &SelectQuery) -> (String, Vec<Value>) {
    let mut sql = format!(
        "SELECT {} FROM {} AS t",
        projection(query.table),
        query.table.name()
    );
    let mut binds = Vec::new();

    if let Some(filter) = &query.filter {
        if filter.value.is_null() {
            sql.push_str(&format!(" WHERE t.{} IS NULL", quote(filter.column)));
        } else {
            sql.push_str(&format!(" WHERE to_jsonb(t.{}) = $1", quote(filter.column)));
            binds.push(filter.value.clone());
        }
    }

    if let Some(order) = &query.order {
        let direction = if order.ascending { "ASC" } else { "DESC" };
        sql.push_str(&format!(" ORDER BY t.{} {direction}", quote(order.column)));
    }

    (sql, binds)
}

fn column_list(row: &Row) -> String {
    row.keys().map(|k| quote(k)).collect::<Vec<_>>().join(", ")
}

pub fn insert_sql(table: Table, row: &Row) -> String {
    let name = table.name();
    if row.is_empty() {
        return format!(
            "INSERT INTO {name} AS t DEFAULT VALUES RETURNING {}",
            projection(table)
        );
    }
    let columns = column_list(row);
    format!(
        "INSERT INTO {name} AS t ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{name}, $1) RETURNING {}",
        projection(table)
    )
}

/// `$1` is the id, `$2` the patch. `patch` must not be empty.
pub fn update_sql(table: Table, patch: &Row) -> String {
    let name = table.name();
    let columns = column_list(patch);
    format!(
        "UPDATE {name} AS t SET ({columns}) = (SELECT {columns} FROM jsonb_populate_record(NULL::{name}, $2)) WHERE t.id::text = $1 RETURNING {}",
        projection(table)
    )
}

pub fn delete_sql(table: Table) -> String {
    format!("DELETE FROM {} AS t WHERE t.id::text = $1", table.name())
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

#[async_trait]
impl RemoteStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, StoreError> {
        let (sql, binds) = select_sql(query);
        self.fetch_rows(&sql, binds).await
    }

    async fn insert(&self, table: Table, row: &Row) -> Result<Row, StoreError> {
        check_columns(table, row)?;
        let sql = insert_sql(table, row);
        let binds = if row.is_empty() {
            Vec::new()
        } else {
            vec![Value::Object(row.clone())]
        };
        self.fetch_rows(&sql, binds)
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
        if patch.is_empty() {
            let query = SelectQuery::new(table).filter("id", Value::from(id));
            return Ok(self.select(&query).await?.into_iter().next());
        }

        let sql = update_sql(table, patch);
        let row = sqlx::query_scalar::<_, Json<Value>>(&sql)
            .bind(id)
            .bind(Json(Value::Object(patch.clone())))
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(Json(Value::Object(row))) => Ok(Some(row)),
            Some(Json(other)) => Err(StoreError::Decode(format!(
                "expected a row object, got {other}"
            ))),
            None => Ok(None),
        }
    }

    async fn delete(&self, table: Table, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(&delete_sql(table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
