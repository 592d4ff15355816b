//! Size-rotated log file and the logger that writes into it.
//!
//! Lines look like `2024-03-01 09:05:07,123 | WARN | High CPU usage: 91%`.
//! When the next line would push the file past its size cap the file is
//! renamed to `<name>.1` (older backups shift up, the oldest is dropped)
//! and a fresh file is started.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::Level;

use crate::core::config::MonitorConfig;
use crate::error::{Result, VajraError};

pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open `path` for appending, creating it if needed
    pub fn open<P: AsRef<Path>>(path: P, max_bytes: u64, backups: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_append(&path).map_err(|e| {
            VajraError::log_file(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let written = file.metadata()?.len();

        Ok(Self {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the n-th backup, e.g. `vajra.log.2`
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.backups > 0 {
            let oldest = self.backup_path(self.backups);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.backups).rev() {
                let from = self.backup_path(index);
                if from.exists() {
                    fs::rename(&from, self.backup_path(index + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
            self.file = open_append(&self.path)?;
        } else {
            self.file = File::create(&self.path)?;
        }

        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let incoming = buf.len() as u64;
        if self.written > 0 && self.written + incoming >= self.max_bytes {
            self.rotate()?;
        }

        self.file.write_all(buf)?;
        self.written += incoming;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// One log line, without the trailing newline
pub fn format_line(now: &DateTime<Local>, level: Level, message: &fmt::Arguments) -> String {
    format!(
        "{} | {} | {}",
        now.format("%Y-%m-%d %H:%M:%S,%3f"),
        level,
        message
    )
}

/// Route the `log` facade into the rotating log file.
///
/// Defaults to `info`; `RUST_LOG` can still narrow or widen it.
pub fn init_logging(config: &MonitorConfig) -> Result<()> {
    let file = RotatingFile::open(&config.log_path, config.log_max_bytes, config.log_backups)?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(&Local::now(), record.level(), record.args())
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    Ok(())
}
