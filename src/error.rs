use std::io;
use thiserror::Error;

/// Custom error type for Vajra
#[derive(Error, Debug)]
pub enum VajraError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Log file error: {0}")]
    LogFile(String),

    #[error("Logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Result type alias for Vajra
pub type Result<T> = std::result::Result<T, VajraError>;

impl VajraError {
    /// Create a log file error
    pub fn log_file<S: Into<String>>(msg: S) -> Self {
        VajraError::LogFile(msg.into())
    }
}
