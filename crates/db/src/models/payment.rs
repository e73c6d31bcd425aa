//! Payment entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::status::{
    PAYMENT_PENDING, PAYMENT_REJECTED, PAYMENT_STATUSES, PAYMENT_TYPES, PAYMENT_VERIFIED,
};
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_amount, validate_one_of, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `payments` table, with the paying student's name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: RecordId,
    pub student_id: RecordId,
    /// From `students.name`; read-only.
    pub student_name: String,
    pub amount: f64,
    pub date: Option<Date>,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub accepted_by: String,
    pub description: Option<String>,
    pub verified_by: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl Record for Payment {
    const TABLE: Table = Table::Payments;
    type New = NewPayment;
    type Patch = PaymentPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            student_id: mapper::text(row, "student_id"),
            student_name: mapper::joined_text(row, "students", "name"),
            amount: mapper::number(row, "amount"),
            date: mapper::date(row, "date"),
            kind: mapper::text(row, "type"),
            status: mapper::text(row, "status"),
            accepted_by: mapper::text(row, "accepted_by"),
            description: mapper::opt_text(row, "description"),
            verified_by: mapper::opt_text(row, "verified_by"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("student_id", self.student_id.as_str())
            .set_number("amount", self.amount)
            .set_date("date", self.date)
            .set("type", self.kind.as_str())
            .set("status", self.status.as_str())
            .set("accepted_by", self.accepted_by.as_str())
            .set_opt("description", self.description.clone())
            .set_opt("verified_by", self.verified_by.clone())
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for recording a payment. `accepted_by` comes from the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub student_id: RecordId,
    pub amount: f64,
    pub date: Date,
    #[serde(rename = "type")]
    pub kind: String,
    /// Defaults to `pending` when omitted.
    pub status: Option<String>,
    pub description: Option<String>,
}

impl NewRecord for NewPayment {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Student", &self.student_id),
            validate_amount("Amount", self.amount),
            validate_one_of("payment type", &self.kind, PAYMENT_TYPES),
            self.status
                .as_deref()
                .map_or(Ok(()), |s| validate_one_of("status", s, PAYMENT_STATUSES)),
        ])
    }

    fn to_row(&self, session: &Session) -> Row {
        RowBuilder::new()
            .set("student_id", self.student_id.as_str())
            .set_number("amount", self.amount)
            .set_date("date", Some(self.date))
            .set("type", self.kind.as_str())
            .set("status", self.status.as_deref().unwrap_or(PAYMENT_PENDING))
            .set("accepted_by", session.actor())
            .set_opt("description", self.description.clone())
            .build()
    }
}

/// DTO for updating a payment. Only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPatch {
    pub amount: Option<f64>,
    pub date: Option<Date>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    pub verified_by: Option<String>,
}

impl PaymentPatch {
    /// Mark the payment verified by the session user.
    pub fn verify(session: &Session) -> Self {
        Self {
            status: Some(PAYMENT_VERIFIED.to_string()),
            verified_by: Some(session.actor().to_string()),
            ..Default::default()
        }
    }

    /// Mark the payment rejected by the session user.
    pub fn reject(session: &Session) -> Self {
        Self {
            status: Some(PAYMENT_REJECTED.to_string()),
            verified_by: Some(session.actor().to_string()),
            ..Default::default()
        }
    }
}

impl RecordPatch for PaymentPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.amount.map_or(Ok(()), |a| validate_amount("Amount", a)),
            self.kind
                .as_deref()
                .map_or(Ok(()), |k| validate_one_of("payment type", k, PAYMENT_TYPES)),
            self.status
                .as_deref()
                .map_or(Ok(()), |s| validate_one_of("status", s, PAYMENT_STATUSES)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt_number("amount", self.amount)
            .set_date("date", self.date)
            .set_opt("type", self.kind.clone())
            .set_opt("status", self.status.clone())
            .set_opt("description", self.description.clone())
            .set_opt("verified_by", self.verified_by.clone())
            .build()
    }
}
