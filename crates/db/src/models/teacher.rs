//! Teacher entity model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{
    first_error, validate_non_negative, validate_phone, validate_required,
};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `teachers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub subject: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: bool,
    pub created_at: Option<Timestamp>,
}

impl Record for Teacher {
    const TABLE: Table = Table::Teachers;
    type New = NewTeacher;
    type Patch = TeacherPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            name: mapper::text(row, "name"),
            phone: mapper::text(row, "phone"),
            subject: mapper::opt_text(row, "subject"),
            salary: mapper::opt_number(row, "salary"),
            join_date: mapper::date(row, "join_date"),
            active: mapper::flag(row, "active", true),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("name", self.name.as_str())
            .set("phone", self.phone.as_str())
            .set_opt("subject", self.subject.clone())
            .set_opt_number("salary", self.salary)
            .set_date("join_date", self.join_date)
            .set("active", self.active)
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    pub name: String,
    pub phone: String,
    pub subject: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: Option<bool>,
}

impl NewRecord for NewTeacher {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Name", &self.name),
            validate_phone("Phone", &self.phone),
            self.salary
                .map_or(Ok(()), |s| validate_non_negative("Salary", s)),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("name", self.name.trim())
            .set("phone", self.phone.trim())
            .set_opt("subject", self.subject.clone())
            .set_opt_number("salary", self.salary)
            .set_date("join_date", self.join_date)
            .set_opt("active", self.active)
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: Option<bool>,
}

impl RecordPatch for TeacherPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.name.as_deref().map_or(Ok(()), |n| validate_required("Name", n)),
            self.phone.as_deref().map_or(Ok(()), |p| validate_phone("Phone", p)),
            self.salary
                .map_or(Ok(()), |s| validate_non_negative("Salary", s)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("name", self.name.clone())
            .set_opt("phone", self.phone.clone())
            .set_opt("subject", self.subject.clone())
            .set_opt_number("salary", self.salary)
            .set_date("join_date", self.join_date)
            .set_opt("active", self.active)
            .build()
    }
}
