// UI and formatting module

pub mod monitor_tui;
pub mod splash;

// Re-export commonly used items for cleaner imports
pub use monitor_tui::{run_monitor_app, MonitorApp};
pub use splash::show_splash;
