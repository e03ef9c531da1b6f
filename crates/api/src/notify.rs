// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Best-effort notification dispatch.
//!
//! Successful operations produce [`Notification`] values describing what
//! happened. Delivery is fire-and-forget: the server dispatches after
//! commit, and a failed delivery is logged and never rolls an operation
//! back or surfaces to the caller.

use serde::{Deserialize, Serialize};

/// A notification delivery failure.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The sink could not deliver the notification.
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// An outbound notification about a committed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The shopping event the notification concerns.
    pub event_id: i64,
    /// Machine-readable notification kind (e.g. `state_changed`).
    pub event_type: String,
    /// Structured payload for downstream consumers.
    pub payload: serde_json::Value,
}

impl Notification {
    /// Creates a new notification.
    #[must_use]
    pub const fn new(event_id: i64, event_type: String, payload: serde_json::Value) -> Self {
        Self {
            event_id,
            event_type,
            payload,
        }
    }
}

/// Delivery target for outbound notifications.
///
/// Implementations live outside this system (message bus, webhooks).
/// Delivery failures must be swallowed by the dispatcher, never
/// propagated to the operation that produced the notification.
pub trait NotificationSink {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; callers log and continue.
    fn notify(
        &self,
        event_id: i64,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<(), NotifyError>;
}

/// A sink that discards every notification. Default wiring for tests
/// and deployments without a downstream consumer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotificationSink;

impl NotificationSink for NullNotificationSink {
    fn notify(
        &self,
        _event_id: i64,
        _event_type: &str,
        _payload: &serde_json::Value,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Dispatches notifications to a sink, logging failures.
///
/// Best-effort by contract: a failed delivery is logged at `warn` and
/// the remaining notifications are still attempted.
pub fn dispatch_notifications(sink: &dyn NotificationSink, notifications: &[Notification]) {
    for notification in notifications {
        if let Err(e) = sink.notify(
            notification.event_id,
            &notification.event_type,
            &notification.payload,
        ) {
            tracing::warn!(
                event_id = notification.event_id,
                event_type = %notification.event_type,
                error = %e,
                "Notification delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn notify(
            &self,
            _event_id: i64,
            _event_type: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), NotifyError> {
            Err(NotifyError::DeliveryFailed(String::from("bus is down")))
        }
    }

    struct RecordingSink {
        delivered: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(
            &self,
            _event_id: i64,
            event_type: &str,
            _payload: &serde_json::Value,
        ) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .expect("lock poisoned")
                .push(event_type.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_delivers_in_order() {
        let sink = RecordingSink {
            delivered: Mutex::new(Vec::new()),
        };
        let notifications = vec![
            Notification::new(1, String::from("event_created"), serde_json::json!({})),
            Notification::new(1, String::from("state_changed"), serde_json::json!({})),
        ];

        dispatch_notifications(&sink, &notifications);

        assert_eq!(
            *sink.delivered.lock().expect("lock poisoned"),
            vec!["event_created", "state_changed"]
        );
    }

    #[test]
    fn test_dispatch_swallows_delivery_failures() {
        let notifications = vec![Notification::new(
            1,
            String::from("state_changed"),
            serde_json::json!({}),
        )];

        // Must not panic or propagate.
        dispatch_notifications(&FailingSink, &notifications);
    }
}
