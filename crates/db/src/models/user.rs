//! Console user model and DTOs.

use madrasa_core::session::Session;
use madrasa_core::status::USER_ROLES;
use madrasa_core::types::{RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_email, validate_one_of, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: bool,
    pub created_at: Option<Timestamp>,
}

impl User {
    /// Open a console session as this user.
    pub fn session(&self) -> Session {
        Session::new(self.id.clone(), self.name.clone(), self.role.clone())
    }
}

impl Record for User {
    const TABLE: Table = Table::Users;
    type New = NewUser;
    type Patch = UserPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            name: mapper::text(row, "name"),
            email: mapper::text(row, "email"),
            role: mapper::text(row, "role"),
            active: mapper::flag(row, "active", true),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("name", self.name.as_str())
            .set("email", self.email.as_str())
            .set("role", self.role.as_str())
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
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: String,
    pub active: Option<bool>,
}

impl NewRecord for NewUser {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_required("Name", &self.name),
            validate_email(&self.email),
            validate_one_of("role", &self.role, USER_ROLES),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("name", self.name.trim())
            .set("email", self.email.trim().to_lowercase())
            .set("role", self.role.as_str())
            .set_opt("active", self.active)
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

impl RecordPatch for UserPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.name.as_deref().map_or(Ok(()), |n| validate_required("Name", n)),
            self.email.as_deref().map_or(Ok(()), validate_email),
            self.role
                .as_deref()
                .map_or(Ok(()), |r| validate_one_of("role", r, USER_ROLES)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("name", self.name.clone())
            .set_opt("email", self.email.as_deref().map(|e| e.trim().to_lowercase()))
            .set_opt("role", self.role.clone())
            .set_opt("active", self.active)
            .build()
    }
}
