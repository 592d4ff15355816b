use anyhow::{Context, Result};

use crate::core::config::MonitorConfig;
use crate::core::log_file::init_logging;
use crate::ui::{run_monitor_app, show_splash, MonitorApp};

/// Handle 'start' command - splash screen, then the live dashboard
pub fn execute() -> Result<()> {
    let config = MonitorConfig::default();

    init_logging(&config).context("Failed to initialize logging")?;

    // Built first so the CPU baseline ages behind the splash
    let app = MonitorApp::new(&config);

    show_splash();
    println!("Initializing components... (Ctrl+C to exit)");
    log::info!("Vajra started");

    run_monitor_app(app)?;

    log::info!("Vajra stopped");
    log::logger().flush();
    Ok(())
}
