//! Query facade: one fetch/create/update/delete set per entity.
//!
//! [`DataService`] wraps a [`RemoteStore`] and a [`ToastBus`]. Each
//! [`Repo`] method comes in two forms:
//!
//! - fail-soft (`fetch_all`, `create`, ...): never errors to the caller.
//!   Failures publish an error toast and return an empty collection,
//!   `None` or `false`.
//! - strict (`try_fetch_all`, `try_create`, ...): returns a [`DataResult`]
//!   so a caller can tell "no rows" apart from "store unreachable".
//!
//! Input validation runs before any store call in both forms.

use std::marker::PhantomData;
use std::sync::Arc;

use madrasa_core::error::CoreError;
use madrasa_core::session::Session;
use madrasa_events::{Toast, ToastBus};
use serde_json::Value;

use crate::error::{DataError, DataResult};
use crate::models::{
    Donation, Exam, ExamResult, Expense, Notification, Payment, QuranProgress, StaffMember,
    Student, Teacher, User,
};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;
use crate::store::{RemoteStore, SelectQuery};

// ---------------------------------------------------------------------------
// ListQuery
// ---------------------------------------------------------------------------

/// Optional ordering and equality filter for a list fetch.
///
/// Column names are checked against the table schema when the query runs;
/// an unknown column fails validation without contacting the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    order: Option<(String, bool)>,
    filter: Option<(String, Value)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((column.into(), ascending));
        self
    }

    /// Keep only rows where `column` equals `value`.
    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((column.into(), value.into()));
        self
    }

    /// Resolve against `table`'s schema into a store query.
    pub fn resolve(&self, table: Table) -> Result<SelectQuery, CoreError> {
        let mut query = SelectQuery::new(table);
        if let Some((column, value)) = &self.filter {
            query = query.filter(schema_column(table, column)?, value.clone());
        }
        if let Some((column, ascending)) = &self.order {
            query = query.order(schema_column(table, column)?, *ascending);
        }
        Ok(query)
    }
}

fn schema_column(table: Table, column: &str) -> Result<&'static str, CoreError> {
    table
        .columns()
        .iter()
        .copied()
        .find(|c| *c == column)
        .ok_or_else(|| CoreError::Validation(format!("Unknown column '{column}' for {table}")))
}

// ---------------------------------------------------------------------------
// DataService
// ---------------------------------------------------------------------------

/// Entry point for all record access.
#[derive(Clone)]
pub struct DataService {
    store: Arc<dyn RemoteStore>,
    toasts: Arc<ToastBus>,
}

impl DataService {
    pub fn new(store: Arc<dyn RemoteStore>, toasts: Arc<ToastBus>) -> Self {
        Self { store, toasts }
    }

    pub fn store(&self) -> &Arc<dyn RemoteStore> {
        &self.store
    }

    pub fn toasts(&self) -> &Arc<ToastBus> {
        &self.toasts
    }

    /// Repository for any record type.
    pub fn repo<R: Record>(&self) -> Repo<'_, R> {
        Repo {
            service: self,
            _record: PhantomData,
        }
    }

    pub fn students(&self) -> Repo<'_, Student> {
        self.repo()
    }

    pub fn payments(&self) -> Repo<'_, Payment> {
        self.repo()
    }

    pub fn expenses(&self) -> Repo<'_, Expense> {
        self.repo()
    }

    pub fn teachers(&self) -> Repo<'_, Teacher> {
        self.repo()
    }

    pub fn staff(&self) -> Repo<'_, StaffMember> {
        self.repo()
    }

    pub fn donations(&self) -> Repo<'_, Donation> {
        self.repo()
    }

    pub fn exams(&self) -> Repo<'_, Exam> {
        self.repo()
    }

    pub fn exam_results(&self) -> Repo<'_, ExamResult> {
        self.repo()
    }

    pub fn quran_progress(&self) -> Repo<'_, QuranProgress> {
        self.repo()
    }

    pub fn notifications(&self) -> Repo<'_, Notification> {
        self.repo()
    }

    pub fn users(&self) -> Repo<'_, User> {
        self.repo()
    }

    /// Row count per table through the strict `try_fetch_all` path, in
    /// [`Table::ALL`] order.
    pub async fn table_counts(&self) -> Vec<(Table, DataResult<usize>)> {
        let mut counts = Vec::with_capacity(Table::ALL.len());
        for table in Table::ALL {
            let result = match table {
                Table::Students => self.count::<Student>().await,
                Table::Payments => self.count::<Payment>().await,
                Table::Expenses => self.count::<Expense>().await,
                Table::Teachers => self.count::<Teacher>().await,
                Table::Staff => self.count::<StaffMember>().await,
                Table::Donations => self.count::<Donation>().await,
                Table::Exams => self.count::<Exam>().await,
                Table::ExamResults => self.count::<ExamResult>().await,
                Table::QuranProgress => self.count::<QuranProgress>().await,
                Table::Notifications => self.count::<Notification>().await,
                Table::Users => self.count::<User>().await,
            };
            counts.push((table, result));
        }
        counts
    }

    async fn count<R: Record>(&self) -> DataResult<usize> {
        self.repo::<R>()
            .try_fetch_all(&ListQuery::new())
            .await
            .map(|records| records.len())
    }
}

// ---------------------------------------------------------------------------
// Repo
// ---------------------------------------------------------------------------

/// CRUD for one record type, borrowed from a [`DataService`].
pub struct Repo<'a, R> {
    service: &'a DataService,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Repo<'_, R> {
    fn store(&self) -> &dyn RemoteStore {
        self.service.store.as_ref()
    }

    fn label(&self) -> &'static str {
        R::TABLE.label()
    }

    /// Log the failure and publish an error toast.
    fn report(&self, action: &str, id: Option<&str>, err: &DataError) {
        let table = R::TABLE.name();
        if err.is_validation() || err.is_not_found() {
            tracing::warn!(table, action, id, error = %err, "Record operation refused");
        } else {
            tracing::error!(table, action, id, error = %err, "Record operation failed");
        }

        let mut toast = Toast::error(
            format!("Could not {action} {}", self.label().to_lowercase()),
            err.user_message(),
        )
        .with_entity(self.label());
        if let Some(id) = id {
            toast = toast.with_record(id);
        }
        self.service.toasts.publish(toast);
    }

    fn confirm(&self, title: String, id: &str) {
        self.service.toasts.publish(
            Toast::success(title, "")
                .with_entity(self.label())
                .with_record(id),
        );
    }

    // ---- fetch ----

    pub async fn try_fetch_all(&self, query: &ListQuery) -> DataResult<Vec<R>> {
        let select = query.resolve(R::TABLE)?;
        tracing::debug!(table = R::TABLE.name(), op = "select", backend = self.store().backend());
        let rows = self.store().select(&select).await?;
        Ok(rows.iter().map(R::from_row).collect())
    }

    /// List records; empty on any failure.
    pub async fn fetch_all(&self, query: &ListQuery) -> Vec<R> {
        match self.try_fetch_all(query).await {
            Ok(records) => records,
            Err(err) => {
                self.report("load", None, &err);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_one(&self, id: &str) -> DataResult<Option<R>> {
        let select = SelectQuery::new(R::TABLE).filter("id", Value::from(id));
        tracing::debug!(table = R::TABLE.name(), op = "select", id);
        let rows = self.store().select(&select).await?;
        Ok(rows.first().map(R::from_row))
    }

    pub async fn fetch_one(&self, id: &str) -> Option<R> {
        match self.try_fetch_one(id).await {
            Ok(record) => record,
            Err(err) => {
                self.report("load", Some(id), &err);
                None
            }
        }
    }

    // ---- create ----

    /// Insert a record, returning it as the store echoed it back.
    pub async fn try_create(&self, session: &Session, input: &R::New) -> DataResult<R> {
        input.validate().map_err(CoreError::Validation)?;
        let row = input.to_row(session);
        tracing::debug!(table = R::TABLE.name(), op = "insert", actor = session.actor());
        let stored = self.store().insert(R::TABLE, &row).await?;
        let record = R::from_row(&stored);
        self.confirm(format!("{} saved", self.label()), record.id());
        Ok(record)
    }

    pub async fn create(&self, session: &Session, input: &R::New) -> Option<R> {
        match self.try_create(session, input).await {
            Ok(record) => Some(record),
            Err(err) => {
                self.report("save", None, &err);
                None
            }
        }
    }

    // ---- update ----

    /// Write only the patch's provided fields to the record with `id`.
    pub async fn try_update(&self, id: &str, patch: &R::Patch) -> DataResult<R> {
        patch.validate().map_err(CoreError::Validation)?;
        let row = patch.to_row();
        if row.is_empty() {
            return Err(CoreError::Validation("No changes to save".to_string()).into());
        }
        tracing::debug!(table = R::TABLE.name(), op = "update", id, columns = row.len());
        let stored = self
            .store()
            .update(R::TABLE, id, &row)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: self.label(),
                id: id.to_string(),
            })?;
        let record = R::from_row(&stored);
        self.confirm(format!("{} updated", self.label()), id);
        Ok(record)
    }

    pub async fn update(&self, id: &str, patch: &R::Patch) -> Option<R> {
        match self.try_update(id, patch).await {
            Ok(record) => Some(record),
            Err(err) => {
                self.report("update", Some(id), &err);
                None
            }
        }
    }

    // ---- delete ----

    /// Delete by id. Succeeds when no row matched.
    pub async fn try_delete(&self, id: &str) -> DataResult<u64> {
        tracing::debug!(table = R::TABLE.name(), op = "delete", id);
        let removed = self.store().delete(R::TABLE, id).await?;
        self.confirm(format!("{} deleted", self.label()), id);
        Ok(removed)
    }

    pub async fn delete(&self, id: &str) -> bool {
        match self.try_delete(id).await {
            Ok(_) => true,
            Err(err) => {
                self.report("delete", Some(id), &err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Order;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn list_query_resolves_schema_columns() {
        let query = ListQuery::new()
            .filter_eq("group_name", "hifz")
            .order_by("created_at", false)
            .resolve(Table::Students)
            .unwrap();
        assert_eq!(query.filter.unwrap().value, json!("hifz"));
        assert_eq!(
            query.order,
            Some(Order {
                column: "created_at",
                ascending: false
            })
        );
    }

    #[test]
    fn list_query_rejects_unknown_column() {
        let err = ListQuery::new()
            .order_by("nickname", true)
            .resolve(Table::Students)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("nickname"));
    }

    #[test]
    fn empty_list_query_selects_everything() {
        let query = ListQuery::default().resolve(Table::Exams).unwrap();
        assert_eq!(query, SelectQuery::new(Table::Exams));
    }
}
