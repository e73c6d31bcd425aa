//! The signed-in console user.
//!
//! A [`Session`] is created at login and dropped at logout. Operations that
//! stamp an actor onto a record (`accepted_by`, `created_by`, `recorded_by`,
//! `verified_by`) take it as an explicit argument.

use serde::{Deserialize, Serialize};

use crate::status::ROLE_ADMIN;
use crate::types::RecordId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: RecordId,
    /// Display name written into attribution columns.
    pub name: String,
    pub role: String,
}

impl Session {
    pub fn new(
        user_id: impl Into<RecordId>,
        name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: role.into(),
        }
    }

    /// The value stored in attribution columns for records this user creates.
    pub fn actor(&self) -> &str {
        &self.name
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_is_display_name() {
        let session = Session::new("u-1", "Abdullah", "accountant");
        assert_eq!(session.actor(), "Abdullah");
        assert!(!session.is_admin());
    }

    #[test]
    fn serializes_camel_case() {
        let session = Session::new("u-1", "Admin", "admin");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["userId"], "u-1");
        assert!(session.is_admin());
    }
}
