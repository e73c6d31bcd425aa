//! Student entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{
    first_error, validate_non_negative, validate_phone, validate_required,
};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `students` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    pub father_name: String,
    pub mother_name: String,
    pub whatsapp_number: String,
    pub guardian_phone: Option<String>,
    pub address: String,
    /// Class group, e.g. `"hifz"` or `"nazera"`.
    pub group_name: String,
    pub monthly_fee: f64,
    pub birth_date: Option<Date>,
    pub enrollment_number: Option<String>,
    pub active: bool,
    /// Registration date.
    pub created_at: Option<Timestamp>,
}

impl Record for Student {
    const TABLE: Table = Table::Students;
    type New = NewStudent;
    type Patch = StudentPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            name: mapper::text(row, "name"),
            father_name: mapper::text(row, "father_name"),
            mother_name: mapper::text(row, "mother_name"),
            whatsapp_number: mapper::text(row, "whatsapp_number"),
            guardian_phone: mapper::opt_text(row, "guardian_phone"),
            address: mapper::text(row, "address"),
            group_name: mapper::text(row, "group_name"),
            monthly_fee: mapper::number(row, "monthly_fee"),
            birth_date: mapper::date(row, "birth_date"),
            enrollment_number: mapper::opt_text(row, "enrollment_number"),
            active: mapper::flag(row, "active", true),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("name", self.name.as_str())
            .set("father_name", self.father_name.as_str())
            .set("mother_name", self.mother_name.as_str())
            .set("whatsapp_number", self.whatsapp_number.as_str())
            .set_opt("guardian_phone", self.guardian_phone.clone())
            .set("address", self.address.as_str())
            .set("group_name", self.group_name.as_str())
            .set_number("monthly_fee", self.monthly_fee)
            .set_date("birth_date", self.birth_date)
            .set_opt("enrollment_number", self.enrollment_number.clone())
            .set("active", self.active)
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for admitting a new student.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub father_name: String,
    pub mother_name: String,
    pub whatsapp_number: String,
    pub address: String,
    pub group_name: String,
    pub monthly_fee: f64,
    pub guardian_phone: Option<String>,
    pub birth_date: Option<Date>,
    pub enrollment_number: Option<String>,
    /// Defaults to active at the store when omitted.
    pub active: Option<bool>,
}

impl NewRecord for NewStudent {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Name", &self.name),
            validate_required("Father's name", &self.father_name),
            validate_required("Mother's name", &self.mother_name),
            validate_phone("WhatsApp number", &self.whatsapp_number),
            validate_required("Address", &self.address),
            validate_required("Group", &self.group_name),
            validate_non_negative("Monthly fee", self.monthly_fee),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("name", self.name.trim())
            .set("father_name", self.father_name.trim())
            .set("mother_name", self.mother_name.trim())
            .set("whatsapp_number", self.whatsapp_number.trim())
            .set("address", self.address.trim())
            .set("group_name", self.group_name.as_str())
            .set_number("monthly_fee", self.monthly_fee)
            .set_opt("guardian_phone", self.guardian_phone.clone())
            .set_date("birth_date", self.birth_date)
            .set_opt("enrollment_number", self.enrollment_number.clone())
            .set_opt("active", self.active)
            .build()
    }
}

/// DTO for updating a student. Only provided fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub group_name: Option<String>,
    pub monthly_fee: Option<f64>,
    pub birth_date: Option<Date>,
    pub enrollment_number: Option<String>,
    pub active: Option<bool>,
}

impl RecordPatch for StudentPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.name.as_deref().map_or(Ok(()), |v| validate_required("Name", v)),
            self.whatsapp_number
                .as_deref()
                .map_or(Ok(()), |v| validate_phone("WhatsApp number", v)),
            self.group_name
                .as_deref()
                .map_or(Ok(()), |v| validate_required("Group", v)),
            self.monthly_fee
                .map_or(Ok(()), |v| validate_non_negative("Monthly fee", v)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("name", self.name.clone())
            .set_opt("father_name", self.father_name.clone())
            .set_opt("mother_name", self.mother_name.clone())
            .set_opt("whatsapp_number", self.whatsapp_number.clone())
            .set_opt("guardian_phone", self.guardian_phone.clone())
            .set_opt("address", self.address.clone())
            .set_opt("group_name", self.group_name.clone())
            .set_opt_number("monthly_fee", self.monthly_fee)
            .set_date("birth_date", self.birth_date)
            .set_opt("enrollment_number", self.enrollment_number.clone())
            .set_opt("active", self.active)
            .build()
    }
}
