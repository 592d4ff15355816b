use std::time::{Duration, Instant};

use vajra::core::system_monitor::{MountReading, NetworkTotals, SnapshotSampler};
use vajra::MonitorConfig;

use super::common::{reading, scan, ScriptedSource};

#[test]
fn test_process_table_refreshes_every_fourth_cycle() {
    let config = MonitorConfig::default();
    let start = Instant::now();

    let mut source = ScriptedSource::default();
    source.scans.push_back(scan(vec![reading(7, 1, 0)]));
    source.scans.push_back(scan(vec![reading(7, 1, 4000), reading(8, 1, 0)]));
    let mut sampler = SnapshotSampler::starting_at(source, &config, start);

    for cycle in 1..=3 {
        let snapshot = sampler.collect_at(start + Duration::from_secs(cycle));
        assert!(snapshot.top_processes.is_empty());
    }

    let fourth = sampler.collect_at(start + Duration::from_secs(4));
    assert_eq!(fourth.top_processes.len(), 1);
    assert_eq!(fourth.top_processes[0].cpu_percent, 0.0);

    // Cycles 5-7 reuse the cached ranking
    for cycle in 5..=7 {
        let snapshot = sampler.collect_at(start + Duration::from_secs(cycle));
        assert_eq!(snapshot.top_processes, fourth.top_processes);
    }

    // 4000 ms of CPU over 4 s of wall time
    let eighth = sampler.collect_at(start + Duration::from_secs(8));
    assert_eq!(eighth.top_processes[0].pid, 7);
    assert!((eighth.top_processes[0].cpu_percent - 100.0).abs() < 0.01);
    assert_eq!(eighth.top_processes[1].pid, 8);
}

#[test]
fn test_recycled_pid_starts_fresh() {
    let config = MonitorConfig {
        scan_throttle_cycles: 1,
        ..MonitorConfig::default()
    };
    let start = Instant::now();

    let mut source = ScriptedSource::default();
    source.scans.push_back(scan(vec![reading(42, 100, 0)]));
    source.scans.push_back(scan(vec![reading(42, 100, 500)]));
    source.scans.push_back(scan(vec![]));
    source.scans.push_back(scan(vec![reading(42, 200, 900)]));
    let mut sampler = SnapshotSampler::starting_at(source, &config, start);

    sampler.collect_at(start + Duration::from_secs(1));
    let busy = sampler.collect_at(start + Duration::from_secs(2));
    assert!((busy.top_processes[0].cpu_percent - 50.0).abs() < 0.01);

    let gone = sampler.collect_at(start + Duration::from_secs(3));
    assert!(gone.top_processes.is_empty());
    assert!(!sampler.tracker().is_tracked(42));

    let reborn = sampler.collect_at(start + Duration::from_secs(4));
    assert_eq!(reborn.top_processes[0].pid, 42);
    assert_eq!(reborn.top_processes[0].cpu_percent, 0.0);
}

#[test]
fn test_network_rates_and_disk_filtering() {
    let config = MonitorConfig::default();
    let start = Instant::now();

    let mut source = ScriptedSource::default();
    source.network.push_back(NetworkTotals {
        sent_bytes: 1000,
        recv_bytes: 5000,
    });
    source.network.push_back(NetworkTotals {
        sent_bytes: 3000,
        recv_bytes: 6000,
    });
    source.mounts = vec![
        Ok(MountReading {
            device: "/dev/sda1".to_string(),
            fs_type: "ext4".to_string(),
            removable: false,
            total_bytes: 1000,
            available_bytes: 250,
        }),
        Ok(MountReading {
            device: "/dev/sr0".to_string(),
            fs_type: "iso9660".to_string(),
            removable: false,
            total_bytes: 700,
            available_bytes: 0,
        }),
    ];
    let mut sampler = SnapshotSampler::starting_at(source, &config, start);

    let snapshot = sampler.collect_at(start + Duration::from_secs(2));

    assert_eq!(snapshot.network_sent_bytes_per_sec, 1000.0);
    assert_eq!(snapshot.network_recv_bytes_per_sec, 500.0);
    assert_eq!(snapshot.disks.len(), 1);
    assert_eq!(snapshot.disks["/dev/sda1"].percent, 75.0);
}
