use std::collections::BTreeMap;

/// Complete resource reading for one sampling cycle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub cycle: u64,
    pub cpu_total_percent: f32,
    pub cpu_per_core: Vec<f32>,
    pub cpu_frequency_mhz: f64,
    pub memory: MemoryUsage,
    pub disks: BTreeMap<String, DiskUsage>, // keyed by device
    pub network_sent_bytes_per_sec: f64,
    pub network_recv_bytes_per_sec: f64,
    pub top_processes: Vec<ProcessEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryUsage {
    pub percent: f32,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryUsage {
    /// Build from raw byte counts; percent is the share not available.
    pub fn from_bytes(total_bytes: u64, used_bytes: u64, available_bytes: u64) -> Self {
        let percent = if total_bytes > 0 {
            (total_bytes.saturating_sub(available_bytes) as f32 / total_bytes as f32) * 100.0
        } else {
            0.0
        };

        Self {
            percent,
            total_bytes,
            used_bytes,
            available_bytes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
}
