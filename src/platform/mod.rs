// Platform-specific code module

pub mod reclaim;

pub use reclaim::{MemoryReclaimer, OsFamily, PlatformReclaimer};
