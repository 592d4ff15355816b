use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use crate::core::config::MonitorConfig;

use super::metrics::{DiskUsage, ProcessEntry, Snapshot};
use super::process_tracker::ProcessTracker;
use super::source::{MountReading, NetworkTotals, Probe, SysinfoSource, SystemSource};

/// Floor for the elapsed time used in rate calculations
const MIN_ELAPSED_SECS: f64 = 0.001;

const OPTICAL_FILESYSTEMS: &[&str] = &["iso9660", "udf", "cdfs"];

/// Produces one `Snapshot` per call.
///
/// CPU, memory, disk and network figures are refreshed on every call. The
/// process table is the expensive part, so it is scanned only once every
/// `scan_throttle_cycles` calls; in between the previous ranking is returned
/// unchanged.
pub struct SnapshotSampler<S: SystemSource = SysinfoSource> {
    source: S,
    core_count: usize,
    scan_every: u64,
    top_processes: usize,
    cycle: u64,
    last_network: NetworkTotals,
    last_network_at: Instant,
    tracker: ProcessTracker,
    cached_top: Vec<ProcessEntry>,
    min_cpu_interval: Duration,
    cpu_read_at: Instant,
}

impl SnapshotSampler<SysinfoSource> {
    /// Create a sampler over the live system
    pub fn system(config: &MonitorConfig) -> Self {
        Self::new(SysinfoSource::new(), config)
    }
}

impl<S: SystemSource> SnapshotSampler<S> {
    pub fn new(source: S, config: &MonitorConfig) -> Self {
        Self::starting_at(source, config, Instant::now())
    }

    /// Create a sampler whose network baseline is taken at `now`
    pub fn starting_at(mut source: S, config: &MonitorConfig, now: Instant) -> Self {
        // Prime the CPU counters; this first reading has no interval behind it
        let _ = source.read_cpu();
        let last_network = source.read_network();

        Self {
            core_count: source.logical_cores(),
            min_cpu_interval: source.min_cpu_interval(),
            cpu_read_at: Instant::now(),
            source,
            scan_every: config.scan_throttle_cycles.max(1),
            top_processes: config.top_processes,
            cycle: 0,
            last_network,
            last_network_at: now,
            tracker: ProcessTracker::new(),
            cached_top: Vec::new(),
        }
    }

    /// Sample now, first waiting out whatever remains of the source's
    /// minimum CPU interval since the previous CPU read.
    pub fn collect(&mut self) -> Snapshot {
        let wait = self
            .min_cpu_interval
            .saturating_sub(self.cpu_read_at.elapsed());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.collect_at(Instant::now())
    }

    pub fn collect_at(&mut self, now: Instant) -> Snapshot {
        // Advances once per call whether or not the process table is scanned
        self.cycle += 1;

        let cpu = self.source.read_cpu();
        self.cpu_read_at = Instant::now();
        let mut per_core = cpu.per_core;
        per_core.resize(self.core_count, 0.0);

        let memory = self.source.read_memory();

        let (sent_per_sec, recv_per_sec) = self.network_rates(now);

        if self.cycle % self.scan_every == 0 {
            self.cached_top = self.scan_processes(now, memory.total_bytes);
        }

        Snapshot {
            cycle: self.cycle,
            cpu_total_percent: cpu.total_percent.clamp(0.0, 100.0),
            cpu_per_core: per_core,
            cpu_frequency_mhz: cpu.frequency_mhz.max(0.0),
            memory,
            disks: self.collect_disks(),
            network_sent_bytes_per_sec: sent_per_sec,
            network_recv_bytes_per_sec: recv_per_sec,
            top_processes: self.cached_top.clone(),
        }
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn core_count(&self) -> usize {
        self.core_count
    }

    /// Pid tracking state, exposed for inspection
    pub fn tracker(&self) -> &ProcessTracker {
        &self.tracker
    }

    /// Give back memory held between scans: spare tracker capacity, the
    /// cached ranking's slack and the source's OS caches.
    ///
    /// Returns the number of released entries (slots and cached records).
    pub fn release_caches(&mut self) -> usize {
        let tracker_slots = self.tracker.release_spare();

        let ranking_slots = self.cached_top.capacity() - self.cached_top.len();
        self.cached_top.shrink_to_fit();

        let source_entries = self.source.release_caches();
        // The source may have re-primed its CPU counters
        self.cpu_read_at = Instant::now();

        log::debug!(
            "Released {} tracker slots, {} ranking slots, {} source entries",
            tracker_slots,
            ranking_slots,
            source_entries
        );
        tracker_slots + ranking_slots + source_entries
    }

    fn network_rates(&mut self, now: Instant) -> (f64, f64) {
        let current = self.source.read_network();
        let elapsed_secs = now
            .saturating_duration_since(self.last_network_at)
            .as_secs_f64();

        let sent = counter_rate(self.last_network.sent_bytes, current.sent_bytes, elapsed_secs);
        let recv = counter_rate(self.last_network.recv_bytes, current.recv_bytes, elapsed_secs);

        self.last_network = current;
        self.last_network_at = now;

        (sent, recv)
    }

    fn scan_processes(&mut self, now: Instant, total_memory: u64) -> Vec<ProcessEntry> {
        let scan = self.source.read_processes();

        // Dead pids go first so a recycled pid starts from a fresh baseline
        let removed = self.tracker.reconcile(&scan.live);
        if removed > 0 {
            log::debug!("Dropped {} exited processes from tracking", removed);
        }

        let mut entries = Vec::with_capacity(scan.readings.len());
        for probe in scan.readings {
            match probe {
                Ok(reading) => {
                    let cpu_percent = self.tracker.observe(&reading, now);
                    let memory_percent = if total_memory > 0 {
                        (reading.memory_bytes as f32 / total_memory as f32) * 100.0
                    } else {
                        0.0
                    };

                    entries.push(ProcessEntry {
                        pid: reading.pid,
                        name: reading.name,
                        cpu_percent,
                        memory_percent,
                    });
                }
                Err(skipped) => {
                    self.tracker.forget(skipped.key);
                    log::trace!("Skipped pid {}: {:?}", skipped.key, skipped.reason);
                }
            }
        }

        rank_processes(entries, self.top_processes)
    }

    fn collect_disks(&mut self) -> BTreeMap<String, DiskUsage> {
        self.source
            .read_mounts()
            .into_iter()
            .filter_map(reportable_mount)
            .map(|mount| {
                let used = mount.total_bytes.saturating_sub(mount.available_bytes);
                let usage = DiskUsage {
                    total_bytes: mount.total_bytes,
                    used_bytes: used,
                    free_bytes: mount.available_bytes,
                    percent: (used as f32 / mount.total_bytes as f32) * 100.0,
                };
                (mount.device, usage)
            })
            .collect()
    }
}

/// Bytes per second between two readings of a cumulative counter.
///
/// A counter that went backwards was reset (reboot, interface removed) and
/// yields 0 for that interval.
pub fn counter_rate(previous: u64, current: u64, elapsed_secs: f64) -> f64 {
    if current < previous {
        return 0.0;
    }

    (current - previous) as f64 / elapsed_secs.max(MIN_ELAPSED_SECS)
}

/// Stable sort by CPU descending, keeping enumeration order among ties
pub fn rank_processes(mut entries: Vec<ProcessEntry>, limit: usize) -> Vec<ProcessEntry> {
    entries.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(limit);
    entries
}

fn reportable_mount(probe: Probe<MountReading, String>) -> Option<MountReading> {
    let mount = match probe {
        Ok(mount) => mount,
        Err(skipped) => {
            log::trace!("Skipped mount {}: {:?}", skipped.key, skipped.reason);
            return None;
        }
    };

    let fs_type = mount.fs_type.to_ascii_lowercase();
    if fs_type.is_empty()
        || OPTICAL_FILESYSTEMS.contains(&fs_type.as_str())
        || mount.removable
        || mount.total_bytes == 0
    {
        return None;
    }

    Some(mount)
}
