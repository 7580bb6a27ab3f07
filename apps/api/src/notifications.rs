//! Notification port. The interview workflow reports outcomes here; the HTTP layer
//! exposes a session's notifications so any client can render them as toasts.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Maximum notifications retained per session. Oldest are dropped first.
const MAX_RETAINED: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub emitted_at: DateTime<Utc>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str, variant: NotificationVariant);
}

/// Per-session notification buffer.
#[derive(Debug, Default)]
pub struct SessionNotifications {
    entries: Mutex<VecDeque<Notification>>,
}

impl SessionNotifications {
    pub fn snapshot(&self) -> Vec<Notification> {
        self.lock().iter().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // A poisoned buffer still holds valid notifications.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Notifier for SessionNotifications {
    fn notify(&self, title: &str, description: &str, variant: NotificationVariant) {
        info!(?variant, "Notification: {title}: {description}");
        let mut entries = self.lock();
        if entries.len() == MAX_RETAINED {
            entries.pop_front();
        }
        entries.push_back(Notification {
            title: title.to_string(),
            description: description.to_string(),
            variant,
            emitted_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_are_recorded_in_order() {
        let notes = SessionNotifications::default();
        notes.notify("First", "one", NotificationVariant::Default);
        notes.notify("Second", "two", NotificationVariant::Destructive);

        let snapshot = notes.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].title, "First");
        assert_eq!(snapshot[1].variant, NotificationVariant::Destructive);
    }

    #[test]
    fn test_buffer_drops_oldest_beyond_limit() {
        let notes = SessionNotifications::default();
        for i in 0..(MAX_RETAINED + 3) {
            notes.notify(&format!("n{i}"), "", NotificationVariant::Default);
        }
        let snapshot = notes.snapshot();
        assert_eq!(snapshot.len(), MAX_RETAINED);
        assert_eq!(snapshot[0].title, "n3");
    }

    #[test]
    fn test_variant_serializes_lowercase() {
        let json = serde_json::to_string(&NotificationVariant::Destructive).unwrap();
        assert_eq!(json, r#""destructive""#);
    }
}
