//! In-process toast bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`ToastBus`] fans every published [`Toast`] out to all current
//! subscribers. It is shared via `Arc<ToastBus>` between the data service and
//! whatever renders notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use madrasa_core::types::RecordId;

// ---------------------------------------------------------------------------
// Toast
// ---------------------------------------------------------------------------

/// Severity of a toast, which the view maps to colour and icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient notification shown to the console user.
///
/// Constructed via [`Toast::new`] or one of the level shortcuts and enriched
/// with [`with_entity`](Toast::with_entity) / [`with_record`](Toast::with_record).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: ToastLevel,

    /// Short heading, e.g. `"Could not save payment"`.
    pub title: String,

    /// Longer detail text; may be empty.
    pub message: String,

    /// Entity label the toast concerns (e.g. `"Student"`).
    pub entity: Option<String>,

    /// Identifier of the affected record, when there is one.
    pub record_id: Option<RecordId>,

    pub timestamp: DateTime<Utc>,
}

impl Toast {
    pub fn new(level: ToastLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            entity: None,
            record_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Success, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Info, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastLevel::Error, title, message)
    }

    /// Attach the entity label.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attach the affected record id.
    pub fn with_record(mut self, record_id: impl Into<RecordId>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }
}

// ---------------------------------------------------------------------------
// ToastBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out bus for toasts.
///
/// # Usage
///
/// ```rust
/// use madrasa_events::{Toast, ToastBus};
///
/// let bus = ToastBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Toast::success("Student saved", ""));
/// ```
pub struct ToastBus {
    sender: broadcast::Sender<Toast>,
}

impl ToastBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread toasts are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a toast to all current subscribers.
    ///
    /// With no subscribers the toast is dropped.
    pub fn publish(&self, toast: Toast) {
        tracing::debug!(level = ?toast.level, title = %toast.title, "Toast published");
        // A SendError only means nobody is listening.
        let _ = self.sender.send(toast);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }
}

impl Default for ToastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
