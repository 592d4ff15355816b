//! System monitoring core functionality.
//!
//! This module turns raw OS readings into per-cycle snapshots and turns
//! snapshots into alert events, running the RAM reclaimer under sustained
//! memory pressure.

pub mod alerts;
mod event_log;
mod metrics;
mod process_tracker;
mod sampler;
pub mod source;

pub use alerts::{format_percent, AlertCoordinator, AlertEvent, RuleKind, Severity};
pub use event_log::{EventLog, LoggedEvent};
pub use metrics::{DiskUsage, MemoryUsage, ProcessEntry, Snapshot};
pub use process_tracker::ProcessTracker;
pub use sampler::{counter_rate, rank_processes, SnapshotSampler};
pub use source::{
    CpuReading, MountReading, NetworkTotals, Probe, ProcessReading, ProcessScan, SkipReason,
    Skipped, SysinfoSource, SystemSource,
};
