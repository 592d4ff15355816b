use std::collections::VecDeque;

use chrono::{DateTime, Local};

use super::alerts::{AlertEvent, Severity};

/// An alert event stamped with the local time it was recorded
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedEvent {
    pub at: DateTime<Local>,
    pub message: String,
    pub severity: Severity,
}

impl LoggedEvent {
    /// `HH:MM:SS` for the dashboard
    pub fn clock(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Circular buffer holding the most recent events (for the dashboard)
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    entries: VecDeque<LoggedEvent>,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: &AlertEvent) {
        self.push_at(event, Local::now());
    }

    pub fn push_at(&mut self, event: &AlertEvent, at: DateTime<Local>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedEvent {
            at,
            message: event.message.clone(),
            severity: event.severity,
        });
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
