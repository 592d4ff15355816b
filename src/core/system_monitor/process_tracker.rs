//! Per-pid CPU accounting baselines.
//!
//! A process's CPU percentage only means something as a delta between two
//! readings, so every tracked pid keeps the accumulated CPU time and the
//! instant it was observed. Entries live exactly as long as the pid is
//! reported by the OS: `reconcile` drops dead pids before new readings are
//! observed, so a recycled pid never inherits a stale baseline.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use super::source::ProcessReading;

#[derive(Debug, Clone, Copy)]
struct TrackEntry {
    start_time: u64,
    cpu_time_ms: u64,
    sampled_at: Instant,
}

#[derive(Debug, Default)]
pub struct ProcessTracker {
    entries: HashMap<u32, TrackEntry>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every tracked pid missing from `live`. Returns how many were removed.
    pub fn reconcile(&mut self, live: &HashSet<u32>) -> usize {
        let dead: Vec<u32> = self
            .entries
            .keys()
            .filter(|pid| !live.contains(pid))
            .copied()
            .collect();

        for pid in &dead {
            self.entries.remove(pid);
        }

        dead.len()
    }

    /// Record a reading and return the CPU percent since the pid's baseline.
    ///
    /// A pid seen for the first time (or whose start time changed) gets a
    /// fresh baseline and reports 0.0.
    pub fn observe(&mut self, reading: &ProcessReading, now: Instant) -> f32 {
        let fresh = TrackEntry {
            start_time: reading.start_time,
            cpu_time_ms: reading.cpu_time_ms,
            sampled_at: now,
        };

        match self.entries.get_mut(&reading.pid) {
            Some(entry)
                if entry.start_time == reading.start_time
                    && reading.cpu_time_ms >= entry.cpu_time_ms =>
            {
                let elapsed_ms = now.saturating_duration_since(entry.sampled_at).as_secs_f64() * 1000.0;
                let delta_ms = (reading.cpu_time_ms - entry.cpu_time_ms) as f64;
                *entry = fresh;

                if elapsed_ms > 0.0 {
                    (delta_ms / elapsed_ms * 100.0) as f32
                } else {
                    0.0
                }
            }
            _ => {
                self.entries.insert(reading.pid, fresh);
                0.0
            }
        }
    }

    pub fn forget(&mut self, pid: u32) -> bool {
        self.entries.remove(&pid).is_some()
    }

    pub fn is_tracked(&self, pid: u32) -> bool {
        self.entries.contains_key(&pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slots allocated for tracked pids, used or not
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Shrink the map to fit the live pids. Returns how many slots were freed.
    pub fn release_spare(&mut self) -> usize {
        let before = self.entries.capacity();
        self.entries.shrink_to_fit();
        before.saturating_sub(self.entries.capacity())
    }
}
