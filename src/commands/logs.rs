use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::*;

use crate::core::config::MonitorConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Reads lines appended to a file since the last poll.
///
/// A file that shrinks (rotated or truncated) is read again from the start.
pub struct LogFollower {
    path: PathBuf,
    offset: u64,
    partial: Vec<u8>,
}

impl LogFollower {
    /// Start following from the current end of the file
    pub fn from_end<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let offset = path.metadata()?.len();
        Ok(Self {
            path,
            offset,
            partial: Vec::new(),
        })
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Complete lines written since the previous call, newline included
    pub fn poll(&mut self) -> io::Result<Vec<String>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            // Briefly missing while the writer rotates
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let len = file.metadata()?.len();
        if len < self.offset {
            self.offset = 0;
            self.partial.clear();
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let read = file.read_to_end(&mut self.partial)?;
        self.offset += read as u64;

        // Decode whole lines only; a character split across polls stays raw
        let mut lines = Vec::new();
        while let Some(end) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=end).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        Ok(lines)
    }
}

/// Handle 'logs' command - follow the tail of the log file until Ctrl+C
pub fn execute() -> Result<()> {
    let config = MonitorConfig::default();
    let name = config.log_path.display().to_string();

    println!("Following {} (Ctrl+C to stop)...", name);

    let mut follower = match LogFollower::from_end(&config.log_path) {
        Ok(follower) => follower,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            println!("{}", format!("Error: {} not found.", name).red());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    // Setup Ctrl+C handler
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    let mut stdout = io::stdout();
    while running.load(Ordering::Relaxed) {
        for line in follower.poll()? {
            print!("{}", line);
        }
        stdout.flush()?;
        thread::sleep(POLL_INTERVAL);
    }

    println!();
    println!("{}", "Stopped.".yellow());
    Ok(())
}
