//! Outbound WhatsApp message model and DTOs.
//!
//! Rows in `notifications` are queued messages; a gateway instance
//! (`instance_id`) delivers them and the console tracks their status.

use madrasa_core::session::Session;
use madrasa_core::status::{
    NOTIFICATION_FAILED, NOTIFICATION_PENDING, NOTIFICATION_SENT, NOTIFICATION_STATUSES,
};
use madrasa_core::types::{RecordId, Timestamp};
use madrasa_core::validation::{first_error, validate_one_of, validate_phone, validate_required};
use serde::{Deserialize, Serialize};

use crate::mapper::{self, Row, RowBuilder};
use crate::record::{NewRecord, Record, RecordPatch};
use crate::schema::Table;

/// A row from the `notifications` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    /// Recipient phone number.
    pub recipient: String,
    pub content: String,
    pub instance_id: String,
    pub status: String,
    pub media_url: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
}

impl Record for Notification {
    const TABLE: Table = Table::Notifications;
    type New = NewNotification;
    type Patch = NotificationPatch;

    fn from_row(row: &Row) -> Self {
        Self {
            id: mapper::text(row, "id"),
            recipient: mapper::text(row, "recipient"),
            content: mapper::text(row, "content"),
            instance_id: mapper::text(row, "instance_id"),
            status: mapper::text(row, "status"),
            media_url: mapper::opt_text(row, "media_url"),
            sent_at: mapper::timestamp(row, "sent_at"),
            created_at: mapper::timestamp(row, "created_at"),
        }
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_text("id", &self.id)
            .set("recipient", self.recipient.as_str())
            .set("content", self.content.as_str())
            .set("instance_id", self.instance_id.as_str())
            .set("status", self.status.as_str())
            .set_opt("media_url", self.media_url.clone())
            .set_timestamp("sent_at", self.sent_at)
            .set_timestamp("created_at", self.created_at)
            .build()
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// DTO for queueing a message. Status starts at `pending`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub recipient: String,
    pub content: String,
    pub instance_id: String,
    pub media_url: Option<String>,
}

impl NewRecord for NewNotification {
    fn validate(&self) -> Result<(), String> {
        first_error([
            validate_phone("Recipient", &self.recipient),
            validate_required("Message", &self.content),
            validate_required("Instance", &self.instance_id),
        ])
    }

    fn to_row(&self, _session: &Session) -> Row {
        RowBuilder::new()
            .set("recipient", self.recipient.trim())
            .set("content", self.content.as_str())
            .set("instance_id", self.instance_id.as_str())
            .set("status", NOTIFICATION_PENDING)
            .set_opt("media_url", self.media_url.clone())
            .build()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    pub status: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub content: Option<String>,
    pub media_url: Option<String>,
}

impl NotificationPatch {
    pub fn sent(at: Timestamp) -> Self {
        Self {
            status: Some(NOTIFICATION_SENT.to_string()),
            sent_at: Some(at),
            ..Default::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            status: Some(NOTIFICATION_FAILED.to_string()),
            ..Default::default()
        }
    }
}

impl RecordPatch for NotificationPatch {
    fn validate(&self) -> Result<(), String> {
        first_error([
            self.status
                .as_deref()
                .map_or(Ok(()), |s| validate_one_of("status", s, NOTIFICATION_STATUSES)),
            self.content
                .as_deref()
                .map_or(Ok(()), |c| validate_required("Message", c)),
        ])
    }

    fn to_row(&self) -> Row {
        RowBuilder::new()
            .set_opt("status", self.status.clone())
            .set_timestamp("sent_at", self.sent_at)
            .set_opt("content", self.content.clone())
            .set_opt("media_url", self.media_url.clone())
            .build()
    }
}
