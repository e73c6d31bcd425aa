//! The remote data store seam.
//!
//! [`RemoteStore`] is the only way the console talks to persistence. It
//! speaks in [`Row`]s and [`Table`]s; mapping to domain objects happens
//! above it, in the facade. Three backends implement it:
//!
//! - [`rest::RestStore`]: a PostgREST-compatible hosted API over HTTPS.
//! - [`pg::PgStore`]: a direct Postgres connection pool.
//! - [`memory::MemoryStore`]: in-process tables for tests and demos.

pub mod memory;
pub mod pg;
pub mod rest;

use async_trait::async_trait;
use serde_json::Value;

use crate::mapper::Row;
use crate::schema::Table;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use rest::RestStore;

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// A single equality predicate, `column = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// A select against one table. Joins come from [`Table::embeds`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: Table,
    pub filter: Option<Filter>,
    pub order: Option<Order>,
}

impl SelectQuery {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            filter: None,
            order: None,
        }
    }

    pub fn filter(mut self, column: &'static str, value: Value) -> Self {
        self.filter = Some(Filter { column, value });
        self
    }

    pub fn order(mut self, column: &'static str, ascending: bool) -> Self {
        self.order = Some(Order { column, ascending });
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from any store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store answered and refused the operation.
    #[error("Store rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status, or 400 for constraint failures reported without one.
        status: u16,
        /// Backend error code, e.g. `23505` for a unique violation.
        code: Option<String>,
        message: String,
    },

    /// The store could not be reached at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something that is not a row set.
    #[error("Unexpected store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// `true` when the failure means "could not talk to the store" rather
    /// than "the store said no".
    pub fn is_unreachable(&self) -> bool {
        match self {
            StoreError::Request(e) => !e.is_decode() && !e.is_status(),
            StoreError::Database(e) => matches!(
                e,
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
            ),
            StoreError::Unavailable(_) => true,
            StoreError::Rejected { .. } | StoreError::Decode(_) => false,
        }
    }

    /// Text suitable for a toast.
    ///
    /// Store rejections carry the store's own message (e.g. a constraint
    /// violation); everything else is summarised.
    pub fn user_message(&self) -> String {
        if self.is_unreachable() {
            return "Could not reach the server. Check the connection and try again.".to_string();
        }
        match self {
            StoreError::Rejected { message, .. } => message.clone(),
            StoreError::Database(sqlx::Error::Database(db_err)) => db_err.message().to_string(),
            StoreError::Database(sqlx::Error::RowNotFound) => "Record not found".to_string(),
            _ => "The server returned an unexpected response".to_string(),
        }
    }

    pub(crate) fn unknown_column(table: Table, column: &str) -> Self {
        StoreError::Rejected {
            status: 400,
            code: Some("PGRST204".to_string()),
            message: format!("Could not find the '{column}' column of '{table}'"),
        }
    }
}

/// Reject any column the table does not declare.
///
/// Column names end up in generated SQL and query strings, so nothing
/// outside the schema may pass.
pub(crate) fn check_columns(table: Table, row: &Row) -> Result<(), StoreError> {
    match row.keys().find(|k| !table.has_column(k)) {
        Some(column) => Err(StoreError::unknown_column(table, column)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// RemoteStore
// ---------------------------------------------------------------------------

/// Table-level CRUD against the hosted relational store.
///
/// Implementations own identity generation and constraint enforcement.
/// Returned rows include the table's joined relations nested under the
/// relation's table name.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>, StoreError>;

    /// Insert one row and return it as stored (generated columns filled).
    async fn insert(&self, table: Table, row: &Row) -> Result<Row, StoreError>;

    /// Apply `patch` to the row with `id`. `Ok(None)` when no row matched.
    async fn update(&self, table: Table, id: &str, patch: &Row)
        -> Result<Option<Row>, StoreError>;

    /// Delete the row with `id`, returning how many rows were removed.
    async fn delete(&self, table: Table, id: &str) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
