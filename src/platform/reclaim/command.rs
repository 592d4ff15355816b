//! Reclamation by running an OS utility.

use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::ReclaimStep;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs a program with its output discarded; succeeds on exit status 0.
///
/// The child is killed once `timeout` elapses so a hung utility cannot
/// stall the sampling loop.
pub struct CommandStep {
    name: &'static str,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandStep {
    pub fn new(name: &'static str, program: &str, args: &[&str], timeout: Duration) -> Self {
        Self {
            name,
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }

    /// macOS `purge`: flush the disk cache
    #[cfg(target_os = "macos")]
    pub fn purge() -> Self {
        Self::new("purge", "purge", &[], Duration::from_secs(5))
    }

    fn run(&self) -> std::io::Result<bool> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.success());
            }

            if Instant::now() >= deadline {
                log::warn!("{} timed out after {:?}", self.program, self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Ok(false);
            }

            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl ReclaimStep for CommandStep {
    fn name(&self) -> &'static str {
        self.name
    }

    fn reclaim_step(&mut self) -> bool {
        match self.run() {
            Ok(success) => success,
            Err(e) => {
                log::debug!("Failed to run {}: {}", self.program, e);
                false
            }
        }
    }
}
