//! Non-teaching staff model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::types::{Date, RecordId, Timestamp};
use madrasa_core::validation::{
    first_error, validate_non_negative, validate_phone, validate_required,
};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `staff` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: RecordId,
    pub name: String,
    /// Job title, e.g. `"cook"` or `"guard"`.
    pub role: String,
    pub phone: String,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: bool,
    pub created_at: Option<Timestamp>,
}

impl Record for StaffMember {
    const TABLE: Table = Table::Staff;
    type New = NewStaffMember;
    type Patch = StaffMemberPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            name: mapper::text(row, "name"),
            role: mapper::text(row, "role"),
            phone: mapper::text(row, "phone"),
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
            .set("role", self.role.as_str())
            .set("phone", self.phone.as_str())
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
pub struct NewStaffMember {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: Option<bool>,
}

impl NewRecord for NewStaffMember {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Name", &self.name),
            validate_required("Role", &self.role),
            validate_phone("Phone", &self.phone),
            self.salary
                .map_or(Ok(()), |s| validate_non_negative("Salary", s)),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("name", self.name.trim())
            .set("role", self.role.trim())
            .set("phone", self.phone.trim())
            .set_opt_number("salary", self.salary)
            .set_date("join_date", self.join_date)
            .set_opt("active", self.active)
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub salary: Option<f64>,
    pub join_date: Option<Date>,
    pub active: Option<bool>,
}

impl RecordPatch for StaffMemberPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.name.as_deref().map_or(Ok(()), |n| validate_required("Name", n)),
            self.role.as_deref().map_or(Ok(()), |r| validate_required("Role", r)),
            self.phone.as_deref().map_or(Ok(()), |p| validate_phone("Phone", p)),
            self.salary
                .map_or(Ok(()), |s| validate_non_negative("Salary", s)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("name", self.name.clone())
            .set_opt("role", self.role.clone())
            .set_opt("phone", self.phone.clone())
            .set_opt_number("salary", self.salary)
            .set_date("join_date", self.join_date)
            .set_opt("active", self.active)
            .build()
    }
}
