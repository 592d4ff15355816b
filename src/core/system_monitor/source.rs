//! Raw OS readings consumed by the snapshot sampler.
//!
//! `SystemSource` is the seam between the sampler's bookkeeping (rates,
//! throttling, pid tracking, filtering) and the OS query primitives. The
//! production implementation is backed by `sysinfo`.

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::time::Duration;

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System, MINIMUM_CPU_UPDATE_INTERVAL,
};

use super::metrics::MemoryUsage;

/// Why a single entity was left out of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entity went away between enumeration and the detail query
    Vanished,
    PermissionDenied,
    Unavailable,
}

impl SkipReason {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            io::ErrorKind::NotFound => SkipReason::Vanished,
            _ => SkipReason::Unavailable,
        }
    }
}

/// An entity that could not be queried this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped<K> {
    pub key: K,
    pub reason: SkipReason,
}

impl<K> Skipped<K> {
    pub fn new(key: K, reason: SkipReason) -> Self {
        Self { key, reason }
    }
}

/// Outcome of querying one entity: its reading, or why it was skipped.
pub type Probe<T, K> = std::result::Result<T, Skipped<K>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuReading {
    pub total_percent: f32,
    pub per_core: Vec<f32>,
    pub frequency_mhz: f64,
}

/// Cumulative byte counters summed over every interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkTotals {
    pub sent_bytes: u64,
    pub recv_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountReading {
    pub device: String,
    pub fs_type: String,
    pub removable: bool,
    pub total_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReading {
    pub pid: u32,
    pub name: String,
    /// Seconds since the epoch; distinguishes a reused pid
    pub start_time: u64,
    /// Accumulated CPU time in milliseconds
    pub cpu_time_ms: u64,
    pub memory_bytes: u64,
}

/// One enumeration of the process table.
///
/// `live` is every pid the OS reported, including those whose detail
/// query failed; `readings` follows enumeration order.
#[derive(Debug, Clone, Default)]
pub struct ProcessScan {
    pub live: HashSet<u32>,
    pub readings: Vec<Probe<ProcessReading, u32>>,
}

/// OS query primitives used by the sampler
pub trait SystemSource {
    fn logical_cores(&self) -> usize;

    /// Non-blocking; usage is averaged since the previous call.
    fn read_cpu(&mut self) -> CpuReading;

    fn read_memory(&mut self) -> MemoryUsage;

    fn read_network(&mut self) -> NetworkTotals;

    fn read_mounts(&mut self) -> Vec<Probe<MountReading, String>>;

    fn read_processes(&mut self) -> ProcessScan;

    /// Shortest gap between two CPU reads that yields a real usage figure
    fn min_cpu_interval(&self) -> Duration {
        Duration::ZERO
    }

    /// Drop cached OS state that the next read can rebuild. Returns how
    /// many cached entries were released.
    fn release_caches(&mut self) -> usize {
        0
    }
}

/// `SystemSource` backed by sysinfo
pub struct SysinfoSource {
    system: System,
    disks: Disks,
    networks: Networks,
}

impl SysinfoSource {
    pub fn new() -> Self {
        Self {
            system: System::new_with_specifics(Self::refresh_kind()),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }

    fn refresh_kind() -> RefreshKind {
        RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything())
    }

    /// Host name for display, if the OS reports one
    pub fn host_name() -> Option<String> {
        System::host_name()
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSource for SysinfoSource {
    fn logical_cores(&self) -> usize {
        self.system.cpus().len()
    }

    fn read_cpu(&mut self) -> CpuReading {
        self.system.refresh_cpu_all();

        let cpus = self.system.cpus();
        let frequency_mhz = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|cpu| cpu.frequency() as f64).sum::<f64>() / cpus.len() as f64
        };

        CpuReading {
            total_percent: self.system.global_cpu_usage(),
            per_core: cpus.iter().map(|cpu| cpu.cpu_usage()).collect(),
            frequency_mhz,
        }
    }

    fn read_memory(&mut self) -> MemoryUsage {
        self.system.refresh_memory();

        MemoryUsage::from_bytes(
            self.system.total_memory(),
            self.system.used_memory(),
            self.system.available_memory(),
        )
    }

    fn read_network(&mut self) -> NetworkTotals {
        self.networks.refresh(true);

        self.networks
            .values()
            .fold(NetworkTotals::default(), |acc, data| NetworkTotals {
                sent_bytes: acc.sent_bytes.saturating_add(data.total_transmitted()),
                recv_bytes: acc.recv_bytes.saturating_add(data.total_received()),
            })
    }

    fn read_mounts(&mut self) -> Vec<Probe<MountReading, String>> {
        self.disks.refresh(true);

        self.disks
            .iter()
            .map(|disk| {
                let device = disk.name().to_string_lossy().to_string();

                // sysinfo hides stat failures; probe the mount point ourselves
                if let Err(e) = probe_mount_point(disk.mount_point()) {
                    return Err(Skipped::new(device, SkipReason::from_io(&e)));
                }

                Ok(MountReading {
                    device,
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    removable: disk.is_removable(),
                    total_bytes: disk.total_space(),
                    available_bytes: disk.available_space(),
                })
            })
            .collect()
    }

    fn min_cpu_interval(&self) -> Duration {
        MINIMUM_CPU_UPDATE_INTERVAL
    }

    fn release_caches(&mut self) -> usize {
        let released = self.system.processes().len();

        // The process map is the bulk of what sysinfo retains. Building the
        // System refreshes CPU once, so the next read still has a baseline.
        self.system = System::new_with_specifics(Self::refresh_kind());

        released
    }

    fn read_processes(&mut self) -> ProcessScan {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let processes = self.system.processes();

        // HashMap order is arbitrary; enumerate by pid so ties stay put
        let mut pids: Vec<_> = processes
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, _)| *pid)
            .collect();
        pids.sort_unstable();

        let mut scan = ProcessScan::default();
        for pid in pids {
            let Some(process) = processes.get(&pid) else {
                continue;
            };
            let pid = pid.as_u32();
            scan.live.insert(pid);

            if !process.exists() {
                scan.readings
                    .push(Err(Skipped::new(pid, SkipReason::Vanished)));
                continue;
            }

            scan.readings.push(Ok(ProcessReading {
                pid,
                name: process.name().to_string_lossy().to_string(),
                start_time: process.start_time(),
                cpu_time_ms: process.accumulated_cpu_time(),
                memory_bytes: process.memory(),
            }));
        }

        scan
    }
}

fn probe_mount_point(mount_point: &Path) -> io::Result<()> {
    std::fs::metadata(mount_point).map(|_| ())
}
