// Vajra Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, VajraError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::MonitorConfig;
pub use core::log_file::init_logging;
