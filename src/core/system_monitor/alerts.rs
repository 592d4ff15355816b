//! Threshold alerts and the memory-pressure reaction.
//!
//! Rules are evaluated in a fixed order (CPU, then memory). CPU breaches are
//! reported on every cycle. A memory breach triggers a reclamation pass and
//! is then debounced: nothing more is emitted for memory until the cooldown
//! has elapsed.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::core::config::MonitorConfig;
use crate::platform::reclaim::MemoryReclaimer;

use super::metrics::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

/// A single line for the event log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    pub message: String,
    pub severity: Severity,
}

impl AlertEvent {
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Cpu,
    Memory,
}

#[derive(Debug, Clone, Copy)]
struct AlertRule {
    threshold_percent: f32,
    last_triggered_at: Option<Instant>,
}

impl AlertRule {
    fn new(threshold_percent: f32) -> Self {
        Self {
            threshold_percent,
            last_triggered_at: None,
        }
    }

    fn breached(&self, percent: f32) -> bool {
        percent > self.threshold_percent
    }

    fn cooled_down(&self, now: Instant, cooldown: Duration) -> bool {
        self.last_triggered_at
            .map_or(true, |last| now.saturating_duration_since(last) >= cooldown)
    }
}

/// Turns snapshots into alert events and runs the memory reaction
pub struct AlertCoordinator {
    cpu: AlertRule,
    memory: AlertRule,
    cooldown: Duration,
    reclaimer: Box<dyn MemoryReclaimer>,
}

impl AlertCoordinator {
    pub fn new(config: &MonitorConfig, reclaimer: Box<dyn MemoryReclaimer>) -> Self {
        Self {
            cpu: AlertRule::new(config.cpu_threshold),
            memory: AlertRule::new(config.memory_threshold),
            cooldown: config.cooldown,
            reclaimer,
        }
    }

    pub fn evaluate(&mut self, snapshot: &Snapshot) -> Vec<AlertEvent> {
        self.evaluate_at(snapshot, Instant::now())
    }

    /// Evaluate every rule against `snapshot` as of `now`.
    ///
    /// Returned events are in emission order. A memory trigger runs the
    /// reclaimer synchronously between the "detected" and "completed" lines.
    pub fn evaluate_at(&mut self, snapshot: &Snapshot, now: Instant) -> Vec<AlertEvent> {
        let mut events = Vec::new();

        let cpu = snapshot.cpu_total_percent;
        if self.cpu.breached(cpu) {
            self.cpu.last_triggered_at = Some(now);
            events.push(AlertEvent::warning(format!(
                "High CPU usage: {}%",
                format_percent(cpu)
            )));
        }

        let memory = snapshot.memory.percent;
        if self.memory.breached(memory) {
            if self.memory.cooled_down(now, self.cooldown) {
                self.memory.last_triggered_at = Some(now);
                self.react_to_memory_pressure(memory, &mut events);
            } else {
                log::debug!(
                    "Memory at {}% within cooldown, reclamation suppressed",
                    format_percent(memory)
                );
            }
        }

        events
    }

    pub fn last_triggered(&self, kind: RuleKind) -> Option<Instant> {
        match kind {
            RuleKind::Cpu => self.cpu.last_triggered_at,
            RuleKind::Memory => self.memory.last_triggered_at,
        }
    }

    fn react_to_memory_pressure(&mut self, percent: f32, events: &mut Vec<AlertEvent>) {
        let shown = format_percent(percent);
        events.push(AlertEvent::info(format!(
            "High memory ({}%) detected. Cleaning RAM...",
            shown
        )));

        let reclaimer = &mut self.reclaimer;
        let reclaimed = match panic::catch_unwind(AssertUnwindSafe(|| reclaimer.reclaim())) {
            Ok(reclaimed) => reclaimed,
            Err(_) => {
                log::error!("RAM cleanup error: reclaimer panicked");
                false
            }
        };

        events.push(if reclaimed {
            AlertEvent::info("RAM cleanup completed (best-effort)")
        } else {
            AlertEvent::warning("RAM cleanup skipped (OS restricted)")
        });

        events.push(AlertEvent::warning(format!(
            "High Memory usage: {}%",
            shown
        )));
    }
}

/// One decimal, without a trailing `.0`
pub fn format_percent(value: f32) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    format!("{}", rounded)
}
