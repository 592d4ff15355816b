use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::Mutex;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::MonitorConfig;
use crate::core::system_monitor::{
    AlertCoordinator, AlertEvent, EventLog, Severity, Snapshot, SnapshotSampler, SysinfoSource,
    SystemSource,
};
use crate::platform::reclaim::{PlatformReclaimer, ReleaseHook};

use super::event_handler::MonitorEvent;
use super::render::render_ui;

/// Monitor application state
pub struct MonitorApp<S: SystemSource = SysinfoSource> {
    pub snapshot: Snapshot,
    pub events: EventLog,
    pub host_name: String,
    pub refresh_interval: Duration,
    pub should_quit: bool,
    sampler: Arc<Mutex<SnapshotSampler<S>>>,
    coordinator: AlertCoordinator,
}

impl MonitorApp<SysinfoSource> {
    /// Build the app over the live system. This primes the CPU baseline, so
    /// call it before anything slow (the splash) runs.
    pub fn new(config: &MonitorConfig) -> Self {
        let sampler = Arc::new(Mutex::new(SnapshotSampler::system(config)));

        let mut reclaimer = PlatformReclaimer::new();
        reclaimer.add_release_hook(sampler_release_hook(&sampler));

        Self::with_shared_sampler(
            config,
            sampler,
            AlertCoordinator::new(config, Box::new(reclaimer)),
            SysinfoSource::host_name().unwrap_or_else(|| "localhost".to_string()),
        )
    }
}

/// Release hook that hands the sampler's caches back during a reclaim pass
pub fn sampler_release_hook<S>(sampler: &Arc<Mutex<SnapshotSampler<S>>>) -> ReleaseHook
where
    S: SystemSource + Send + 'static,
{
    let sampler = Arc::clone(sampler);
    Box::new(move || sampler.lock().release_caches())
}

impl<S: SystemSource> MonitorApp<S> {
    pub fn with_parts(
        config: &MonitorConfig,
        sampler: SnapshotSampler<S>,
        coordinator: AlertCoordinator,
        host_name: String,
    ) -> Self {
        Self::with_shared_sampler(
            config,
            Arc::new(Mutex::new(sampler)),
            coordinator,
            host_name,
        )
    }

    /// Like `with_parts`, for a sampler that reclaim hooks also hold
    pub fn with_shared_sampler(
        config: &MonitorConfig,
        sampler: Arc<Mutex<SnapshotSampler<S>>>,
        coordinator: AlertCoordinator,
        host_name: String,
    ) -> Self {
        Self {
            snapshot: Snapshot::default(),
            events: EventLog::with_capacity(config.event_log_capacity),
            host_name,
            refresh_interval: config.refresh_interval,
            should_quit: false,
            sampler,
            coordinator,
        }
    }

    /// One cycle: sample, evaluate alerts, record the resulting events.
    ///
    /// Returns the events emitted during this cycle.
    pub fn tick(&mut self) -> Vec<AlertEvent> {
        // The guard is dropped here; the reclaimer may lock the sampler
        let snapshot = self.sampler.lock().collect();
        let events = self.coordinator.evaluate(&snapshot);

        for event in &events {
            self.events.push(event);
            match event.severity {
                Severity::Info => log::info!("{}", event.message),
                Severity::Warning => log::warn!("{}", event.message),
            }
        }

        self.snapshot = snapshot;
        events
    }

    pub fn logical_cores(&self) -> usize {
        self.sampler.lock().core_count()
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::None => {}
        }
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(mut app: MonitorApp) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
) -> Result<()> {
    let tick_rate = app.refresh_interval;

    loop {
        let started = Instant::now();
        app.tick();

        terminal.draw(|frame| render_ui(frame, app))?;

        // Wait out the rest of the quantum while staying responsive to keys
        let mut timeout = tick_rate.saturating_sub(started.elapsed());
        while !timeout.is_zero() {
            if event::poll(timeout).context("Event poll failed")? {
                if let Event::Key(key) = event::read().context("Event read failed")? {
                    if key.kind == KeyEventKind::Press {
                        let monitor_event = match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
                            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                                MonitorEvent::Quit
                            }
                            _ => MonitorEvent::None,
                        };
                        app.handle_event(monitor_event);
                    }
                }
            }

            if app.should_quit {
                return Ok(());
            }
            timeout = tick_rate.saturating_sub(started.elapsed());
        }
    }
}
