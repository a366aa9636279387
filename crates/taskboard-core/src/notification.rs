use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

/// A transient message for the user, such as a failed background write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn new(severity: Severity, message: String) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message,
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(Severity::Error, message)
    }
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Bounded queue of notifications waiting to be shown.
///
/// Oldest entries are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
}

impl NotificationLog {
    pub const DEFAULT_CAPACITY: usize = 32;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Take every pending notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.entries.drain(..).collect()
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_oldest_first() {
        let mut log = NotificationLog::new();
        log.notify(Notification::error("first".to_string()));
        log.notify(Notification::new(Severity::Info, "second".to_string()));

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].severity, Severity::Info);
        assert!(log.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = NotificationLog::with_capacity(2);
        for i in 0..3 {
            log.notify(Notification::error(format!("n{}", i)));
        }
        let messages: Vec<_> = log.iter().map(|n| n.message.clone()).collect();
        assert_eq!(messages, vec!["n1", "n2"]);
    }
}
