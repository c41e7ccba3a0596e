//! In-memory alert feed shared by the other state holders.
//!
//! Holders never reach for a global feed; callers pass `&mut NotificationCenter`
//! into any operation that may raise an alert.

use chrono::Utc;
use tracing::debug;

use crate::models::{new_id, Notification, NotificationKind, Priority};

pub const DEFAULT_MAX_NOTIFICATIONS: usize = 200;

/// Caller-supplied part of a notification.
#[derive(Debug, Clone)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: Priority,
}

impl NotificationDraft {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
            priority,
        }
    }
}

/// Newest-first list of notifications, capped at `max_len` entries.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    notifications: Vec<Notification>,
    max_len: usize,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_NOTIFICATIONS)
    }
}

impl NotificationCenter {
    pub fn with_capacity_limit(max_len: usize) -> Self {
        Self {
            notifications: Vec::new(),
            max_len: max_len.max(1),
        }
    }

    /// Appends an unread notification stamped with the current time and
    /// returns its id. The oldest entry is dropped once the cap is reached.
    pub fn add(&mut self, draft: NotificationDraft) -> String {
        let notification = Notification {
            id: new_id(),
            title: draft.title,
            message: draft.message,
            kind: draft.kind,
            priority: draft.priority,
            timestamp: Utc::now(),
            read: false,
        };
        let id = notification.id.clone();
        debug!(title = %notification.title, kind = notification.kind.as_str(), "notification added");

        self.notifications.insert(0, notification);
        self.notifications.truncate(self.max_len);
        id
    }

    pub fn all(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.read)
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }

    pub fn mark_as_read(&mut self, id: &str) {
        if let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) {
            notification.read = true;
        }
    }

    pub fn mark_all_as_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.notifications.retain(|n| n.id != id);
    }

    pub fn clear_all(&mut self) {
        self.notifications.clear();
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
