//! Expense entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::status::{EXPENSE_APPROVED, EXPENSE_PENDING, EXPENSE_REJECTED, EXPENSE_STATUSES};
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_amount, validate_one_of, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `expenses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: RecordId,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub status: String,
    pub created_by: String,
    pub description: Option<String>,
    pub verified_by: Option<String>,
    pub date: Option<Date>,
    pub created_at: Option<Timestamp>,
}

impl Record for Expense {
    const TABLE: Table = Table::Expenses;
    type New = NewExpense;
    type Patch = ExpensePatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            title: mapper::text(row, "title"),
            amount: mapper::number(row, "amount"),
            category: mapper::text(row, "category"),
            subcategory: mapper::text(row, "subcategory"),
            status: mapper::text(row, "status"),
            created_by: mapper::text(row, "created_by"),
            description: mapper::opt_text(row, "description"),
            verified_by: mapper::opt_text(row, "verified_by"),
            date: mapper::date(row, "date"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("title", self.title.as_str())
            .set_number("amount", self.amount)
            .set("category", self.category.as_str())
            .set("subcategory", self.subcategory.as_str())
            .set("status", self.status.as_str())
            .set("created_by", self.created_by.as_str())
            .set_opt("description", self.description.clone())
            .set_opt("verified_by", self.verified_by.clone())
            .set_date("date", self.date)
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for recording an expense. `created_by` comes from the session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    /// Defaults to `pending` when omitted.
    pub status: Option<String>,
    pub description: Option<String>,
    pub date: Option<Date>,
}

impl NewRecord for NewExpense {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Title", &self.title),
            validate_amount("Amount", self.amount),
            validate_required("Category", &self.category),
            validate_required("Subcategory", &self.subcategory),
            self.status
                .as_deref()
                .map_or(Ok(()), |s| validate_one_of("status", s, EXPENSE_STATUSES)),
        ])
    }

    fn to_row(&self, session: &Session) -> Row {
        RowBuilder::new()
            .set("title", self.title.trim())
            .set_number("amount", self.amount)
            .set("category", self.category.as_str())
            .set("subcategory", self.subcategory.as_str())
            .set("status", self.status.as_deref().unwrap_or(EXPENSE_PENDING))
            .set("created_by", session.actor())
            .set_opt("description", self.description.clone())
            .set_date("date", self.date)
            .build()
    }
}

/// DTO for updating an expense. Only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub verified_by: Option<String>,
    pub date: Option<Date>,
}

impl ExpensePatch {
    pub fn approve(session: &Session) -> Self {
        Self {
            status: Some(EXPENSE_APPROVED.to_string()),
            verified_by: Some(session.actor().to_string()),
            ..Default::default()
        }
    }

    pub fn reject(session: &Session) -> Self {
        Self {
            status: Some(EXPENSE_REJECTED.to_string()),
            verified_by: Some(session.actor().to_string()),
            ..Default::default()
        }
    }
}

impl RecordPatch for ExpensePatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.title
                .as_deref()
                .map_or(Ok(()), |t| validate_required("Title", t)),
            self.amount.map_or(Ok(()), |a| validate_amount("Amount", a)),
            self.status
                .as_deref()
                .map_or(Ok(()), |s| validate_one_of("status", s, EXPENSE_STATUSES)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("title", self.title.clone())
            .set_opt_number("amount", self.amount)
            .set_opt("category", self.category.clone())
            .set_opt("subcategory", self.subcategory.clone())
            .set_opt("status", self.status.clone())
            .set_opt("description", self.description.clone())
            .set_opt("verified_by", self.verified_by.clone())
            .set_date("date", self.date)
            .build()
    }
}
