//! Outcome events for Mealdesk operations
//!
//! The core never renders feedback itself. Each operation emits a typed
//! [`AdminEvent`] on the [`EventBus`]; the presentation layer subscribes and
//! turns events into notifications (see [`AdminEvent::notification`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Remote operations against the food resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOp {
    List,
    Create,
    Update,
    Delete,
}

impl StoreOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOp::List => "list",
            StoreOp::Create => "create",
            StoreOp::Update => "update",
            StoreOp::Delete => "delete",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mealdesk event types
///
/// Serialized with an internal `type` tag so events can be forwarded as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AdminEvent {
    /// A remote operation completed
    Succeeded {
        /// Correlates the event with the operation that produced it
        operation_id: Uuid,
        op: StoreOp,
        /// Affected record, when the operation targets one
        record_id: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// A remote operation failed; local state was left unchanged
    Failed {
        operation_id: Uuid,
        op: StoreOp,
        record_id: Option<String>,
        /// Human-readable failure reason
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// The canonical collection was replaced by a fresh fetch
    CollectionRefreshed {
        /// Number of records now held
        count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl AdminEvent {
    pub fn succeeded(op: StoreOp, record_id: Option<String>) -> Self {
        AdminEvent::Succeeded {
            operation_id: Uuid::new_v4(),
            op,
            record_id,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(op: StoreOp, record_id: Option<String>, reason: impl Into<String>) -> Self {
        AdminEvent::Failed {
            operation_id: Uuid::new_v4(),
            op,
            record_id,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn refreshed(count: usize) -> Self {
        AdminEvent::CollectionRefreshed {
            count,
            timestamp: Utc::now(),
        }
    }

    /// Toast-style notification for this event
    ///
    /// Returns `None` for events that are not user-facing (refreshes and
    /// successful list fetches).
    pub fn notification(&self) -> Option<Notification> {
        match self {
            AdminEvent::Succeeded { op, .. } => {
                let detail = match op {
                    StoreOp::List => return None,
                    StoreOp::Create => "Food added successfully!",
                    StoreOp::Update => "Food updated successfully!",
                    StoreOp::Delete => "Food deleted successfully!",
                };
                Some(Notification::new(NotificationSeverity::Success, "Success", detail))
            }
            AdminEvent::Failed { op, .. } => {
                let detail = match op {
                    StoreOp::List => "Failed to load foods.",
                    StoreOp::Create => "Failed to add food.",
                    StoreOp::Update => "Failed to update food.",
                    StoreOp::Delete => "Failed to delete food.",
                };
                Some(Notification::new(NotificationSeverity::Error, "Error", detail))
            }
            AdminEvent::CollectionRefreshed { .. } => None,
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationSeverity {
    Success,
    Error,
}

/// Transient user feedback derived from an [`AdminEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub summary: String,
    pub detail: String,
}

impl Notification {
    fn new(severity: NotificationSeverity, summary: &str, detail: &str) -> Self {
        Self {
            severity,
            summary: summary.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.summary, self.detail)
    }
}

/// Broadcast channel for [`AdminEvent`]s
///
/// Cloning an `EventBus` yields another handle onto the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AdminEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use mealdesk_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<AdminEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: AdminEvent,
    ) -> Result<usize, broadcast::error::SendError<AdminEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: AdminEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
