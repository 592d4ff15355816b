use std::collections::{HashSet, VecDeque};

use vajra::core::system_monitor::{
    CpuReading, MemoryUsage, MountReading, NetworkTotals, Probe, ProcessReading, ProcessScan,
    SystemSource,
};
use vajra::platform::MemoryReclaimer;

/// Scripted source: each queue is popped once per read, the last value repeats
#[derive(Default)]
pub struct ScriptedSource {
    pub cpu: VecDeque<f32>,
    pub memory: VecDeque<MemoryUsage>,
    pub network: VecDeque<NetworkTotals>,
    pub mounts: Vec<Probe<MountReading, String>>,
    pub scans: VecDeque<ProcessScan>,
    last_cpu: f32,
    last_memory: MemoryUsage,
    last_network: NetworkTotals,
}

impl SystemSource for ScriptedSource {
    fn logical_cores(&self) -> usize {
        2
    }

    fn read_cpu(&mut self) -> CpuReading {
        if let Some(next) = self.cpu.pop_front() {
            self.last_cpu = next;
        }
        CpuReading {
            total_percent: self.last_cpu,
            per_core: vec![self.last_cpu; 2],
            frequency_mhz: 3200.0,
        }
    }

    fn read_memory(&mut self) -> MemoryUsage {
        if let Some(next) = self.memory.pop_front() {
            self.last_memory = next;
        }
        self.last_memory
    }

    fn read_network(&mut self) -> NetworkTotals {
        if let Some(next) = self.network.pop_front() {
            self.last_network = next;
        }
        self.last_network
    }

    fn read_mounts(&mut self) -> Vec<Probe<MountReading, String>> {
        self.mounts.clone()
    }

    fn read_processes(&mut self) -> ProcessScan {
        self.scans.pop_front().unwrap_or_default()
    }
}

/// Memory reading at `percent` of a 1000-byte machine
pub fn memory_at(percent: u64) -> MemoryUsage {
    MemoryUsage::from_bytes(1000, percent * 10, 1000 - percent * 10)
}

pub fn scan(readings: Vec<ProcessReading>) -> ProcessScan {
    let live: HashSet<u32> = readings.iter().map(|r| r.pid).collect();
    ProcessScan {
        live,
        readings: readings.into_iter().map(Ok).collect(),
    }
}

pub fn reading(pid: u32, start_time: u64, cpu_time_ms: u64) -> ProcessReading {
    ProcessReading {
        pid,
        name: format!("worker-{}", pid),
        start_time,
        cpu_time_ms,
        memory_bytes: 100,
    }
}

pub struct FixedReclaimer(pub bool);

impl MemoryReclaimer for FixedReclaimer {
    fn reclaim(&mut self) -> bool {
        self.0
    }
}
