//! Donation entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_amount, validate_phone, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `donations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: RecordId,
    pub donor_name: String,
    pub donor_phone: Option<String>,
    pub amount: f64,
    pub date: Option<Date>,
    /// What the donation is earmarked for, e.g. `"zakat"` or `"building"`.
    pub purpose: Option<String>,
    pub accepted_by: String,
    pub created_at: Option<Timestamp>,
}

impl Record for Donation {
    const TABLE: Table = Table::Donations;
    type New = NewDonation;
    type Patch = DonationPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            donor_name: mapper::text(row, "donor_name"),
            donor_phone: mapper::opt_text(row, "donor_phone"),
            amount: mapper::number(row, "amount"),
            date: mapper::date(row, "date"),
            purpose: mapper::opt_text(row, "purpose"),
            accepted_by: mapper::text(row, "accepted_by"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("donor_name", self.donor_name.as_str())
            .set_opt("donor_phone", self.donor_phone.clone())
            .set_number("amount", self.amount)
            .set_date("date", self.date)
            .set_opt("purpose", self.purpose.clone())
            .set("accepted_by", self.accepted_by.as_str())
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for recording a donation. `accepted_by` comes from the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    pub donor_name: String,
    pub donor_phone: Option<String>,
    pub amount: f64,
    pub date: Date,
    pub purpose: Option<String>,
}

impl NewRecord for NewDonation {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Donor name", &self.donor_name),
            validate_amount("Amount", self.amount),
            self.donor_phone
                .as_deref()
                .map_or(Ok(()), |p| validate_phone("Donor phone", p)),
        ])
    }

    fn to_row(&self, session: &Session) -> Row {
        RowBuilder::new()
            .set("donor_name", self.donor_name.trim())
            .set_opt("donor_phone", self.donor_phone.clone())
            .set_number("amount", self.amount)
            .set_date("date", Some(self.date))
            .set_opt("purpose", self.purpose.clone())
            .set("accepted_by", session.actor())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPatch {
    pub donor_name: Option<String>,
    pub donor_phone: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<Date>,
    pub purpose: Option<String>,
}

impl RecordPatch for DonationPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.donor_name
                .as_deref()
                .map_or(Ok(()), |n| validate_required("Donor name", n)),
            self.amount.map_or(Ok(()), |a| validate_amount("Amount", a)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("donor_name", self.donor_name.clone())
            .set_opt("donor_phone", self.donor_phone.clone())
            .set_opt_number("amount", self.amount)
            .set_date("date", self.date)
            .set_opt("purpose", self.purpose.clone())
            .build()
    }
}
