use std::time::{Duration, Instant};

use vajra::core::system_monitor::{AlertCoordinator, RuleKind, Severity, SnapshotSampler};
use vajra::ui::MonitorApp;
use vajra::MonitorConfig;

use super::common::{memory_at, FixedReclaimer, ScriptedSource};

fn messages(events: &[vajra::core::system_monitor::AlertEvent]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}

#[test]
fn test_sustained_memory_pressure_is_debounced() {
    let config = MonitorConfig::default();
    let start = Instant::now();

    let mut source = ScriptedSource::default();
    source.memory.push_back(memory_at(95));
    let mut sampler = SnapshotSampler::starting_at(source, &config, start);
    let mut coordinator = AlertCoordinator::new(&config, Box::new(FixedReclaimer(true)));

    let first = sampler.collect_at(start + Duration::from_millis(500));
    let events = coordinator.evaluate_at(&first, start + Duration::from_millis(500));
    assert_eq!(
        messages(&events),
        vec![
            "High memory (95%) detected. Cleaning RAM...",
            "RAM cleanup completed (best-effort)",
            "High Memory usage: 95%",
        ]
    );

    // Every half second for the rest of the minute: silence
    for step in 2..120 {
        let now = start + Duration::from_millis(500 * step);
        let snapshot = sampler.collect_at(now);
        assert!(coordinator.evaluate_at(&snapshot, now).is_empty());
    }

    let now = start + Duration::from_millis(500) + config.cooldown;
    let snapshot = sampler.collect_at(now);
    assert_eq!(coordinator.evaluate_at(&snapshot, now).len(), 3);
    assert_eq!(coordinator.last_triggered(RuleKind::Memory), Some(now));
}

#[test]
fn test_cpu_and_memory_together() {
    let config = MonitorConfig::default();
    let now = Instant::now();

    let mut source = ScriptedSource::default();
    source.cpu.push_back(99.0);
    source.memory.push_back(memory_at(92));
    let mut sampler = SnapshotSampler::starting_at(source, &config, now);
    let mut coordinator = AlertCoordinator::new(&config, Box::new(FixedReclaimer(false)));

    let snapshot = sampler.collect_at(now);
    let events = coordinator.evaluate_at(&snapshot, now);

    assert_eq!(
        messages(&events),
        vec![
            "High CPU usage: 99%",
            "High memory (92%) detected. Cleaning RAM...",
            "RAM cleanup skipped (OS restricted)",
            "High Memory usage: 92%",
        ]
    );
    assert_eq!(events[2].severity, Severity::Warning);
}

#[test]
fn test_app_keeps_last_ten_events() {
    let config = MonitorConfig::default();

    let mut source = ScriptedSource::default();
    source.cpu.push_back(90.0);
    let mut app = MonitorApp::with_parts(
        &config,
        SnapshotSampler::new(source, &config),
        AlertCoordinator::new(&config, Box::new(FixedReclaimer(true))),
        "host".to_string(),
    );

    for _ in 0..15 {
        assert_eq!(app.tick().len(), 1);
    }

    assert_eq!(app.events.len(), 10);
    assert!(app
        .events
        .iter()
        .all(|entry| entry.message == "High CPU usage: 90%"));
    assert_eq!(app.snapshot.cycle, 15);
}
