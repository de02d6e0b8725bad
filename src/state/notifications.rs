use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use uuid::Uuid;

/// Maximum retained notifications; the oldest entry is evicted past this.
pub const NOTIFICATION_CAP: usize = 50;

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Alert,
}

/// A single user-facing notification
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(severity: Severity, message: String, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            severity,
            timestamp: at,
            read: false,
        }
    }
}

/// Newest-first notification log, bounded at `NOTIFICATION_CAP` entries.
///
/// Eviction is strictly FIFO by age: once the cap is exceeded, the oldest
/// entry by insertion order goes, regardless of severity.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
}

impl NotificationLog {
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        while self.entries.len() > NOTIFICATION_CAP {
            self.entries.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Most recently inserted entry.
    pub fn latest(&self) -> Option<&Notification> {
        self.entries.front()
    }
}
