use std::path::PathBuf;
use std::time::Duration;

/// CPU usage above this percentage raises an alert every cycle.
pub const CPU_THRESHOLD_PERCENT: f32 = 85.0;
/// Memory usage above this percentage triggers RAM reclamation.
pub const MEMORY_THRESHOLD_PERCENT: f32 = 90.0;
/// Minimum time between two memory reclamation passes.
pub const MEMORY_COOLDOWN: Duration = Duration::from_secs(60);
/// The process table is scanned once every this many cycles.
pub const SCAN_THROTTLE_CYCLES: u64 = 4;
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(500);
pub const TOP_PROCESSES: usize = 5;
pub const EVENT_LOG_CAPACITY: usize = 10;

pub const LOG_FILE_NAME: &str = "vajra.log";
pub const LOG_MAX_BYTES: u64 = 1024 * 1024;
pub const LOG_BACKUPS: usize = 3;

/// Runtime configuration for the sentinel.
///
/// Every field has a fixed default; there is no config file and no flag
/// that changes them.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub cpu_threshold: f32,
    pub memory_threshold: f32,
    pub cooldown: Duration,
    pub scan_throttle_cycles: u64,
    pub refresh_interval: Duration,
    pub top_processes: usize,
    pub event_log_capacity: usize,
    pub log_path: PathBuf,
    pub log_max_bytes: u64,
    pub log_backups: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cpu_threshold: CPU_THRESHOLD_PERCENT,
            memory_threshold: MEMORY_THRESHOLD_PERCENT,
            cooldown: MEMORY_COOLDOWN,
            scan_throttle_cycles: SCAN_THROTTLE_CYCLES,
            refresh_interval: REFRESH_INTERVAL,
            top_processes: TOP_PROCESSES,
            event_log_capacity: EVENT_LOG_CAPACITY,
            log_path: PathBuf::from(LOG_FILE_NAME),
            log_max_bytes: LOG_MAX_BYTES,
            log_backups: LOG_BACKUPS,
        }
    }
}
