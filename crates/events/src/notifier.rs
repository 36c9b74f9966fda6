//! Fire-and-forget notification emission.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use munim_core::TenantId;

/// One emitted notification.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub tenant_id: TenantId,
    /// Dotted event name, e.g. `"billing.bill_uploaded"`.
    pub event: String,
    pub payload: JsonValue,
    pub occurred_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(tenant_id: TenantId, event: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            tenant_id,
            event: event.into(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}

/// Notification sink (pub side only; delivery is someone else's problem).
///
/// Implementations must be infallible from the caller's point of view: a
/// notifier that cannot deliver should log and drop, never propagate an error
/// into the money-moving operation that emitted.
pub trait Notifier: Send + Sync {
    fn emit(&self, notification: Notification);
}

/// Notifier that drops everything. Default for wiring where nobody listens.
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn emit(&self, _notification: Notification) {}
}

/// Notifier that records emissions in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    inner: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> Vec<Notification> {
        // A poisoned lock only happens if a recording test already panicked;
        // returning the captured list anyway keeps assertions readable.
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn emit(&self, notification: Notification) {
        if let Ok(mut guard) = self.inner.lock() {
            guard.push(notification);
        }
    }
}
