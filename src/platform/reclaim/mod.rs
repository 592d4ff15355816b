//! Best-effort, privilege-free memory reclamation.
//!
//! A reclamation pass runs two independent steps and succeeds if either
//! does:
//!
//! 1. an in-process step that runs the registered release hooks; it
//!    succeeds when the hooks released at least one cached entry,
//! 2. a platform step chosen once from the OS family:
//!    - Windows: trim the working set of every process we may open
//!    - Linux: `malloc_trim(0)` when the libc exports it
//!    - macOS: the `purge` utility
//!
//! Unknown platforms get a no-op step and `reclaim()` returns false without
//! running anything. Nothing here asks for elevation; a step that lacks
//! permission simply reports failure.

use std::panic::{self, AssertUnwindSafe};

mod noop;

#[cfg(all(unix, any(target_os = "macos", test)))]
mod command;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod windows;

pub use noop::NoopStep;

#[cfg(all(unix, any(target_os = "macos", test)))]
pub use command::CommandStep;
#[cfg(target_os = "linux")]
pub use linux::AllocatorTrim;
#[cfg(windows)]
pub use windows::WorkingSetTrim;

/// One platform-specific reclamation technique
pub trait ReclaimStep: Send {
    fn name(&self) -> &'static str;

    /// Whether this step does anything on the current platform
    fn supported(&self) -> bool {
        true
    }

    /// Run the step. Returns true if it executed without fault.
    fn reclaim_step(&mut self) -> bool;
}

/// Anything that can attempt to hand memory back to the OS
pub trait MemoryReclaimer {
    fn reclaim(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    Unknown,
}

impl OsFamily {
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn from_os_name(name: &str) -> Self {
        match name {
            "windows" => OsFamily::Windows,
            "linux" => OsFamily::Linux,
            "macos" => OsFamily::MacOs,
            _ => OsFamily::Unknown,
        }
    }
}

/// Build the platform step for `family`.
///
/// A family this binary was not compiled for maps to the no-op step.
pub fn platform_step(family: OsFamily) -> Box<dyn ReclaimStep> {
    match family {
        #[cfg(windows)]
        OsFamily::Windows => Box::new(WorkingSetTrim),
        #[cfg(target_os = "linux")]
        OsFamily::Linux => Box::new(AllocatorTrim),
        #[cfg(target_os = "macos")]
        OsFamily::MacOs => Box::new(CommandStep::purge()),
        _ => Box::new(NoopStep),
    }
}

/// Drops or shrinks an in-process cache; returns how many entries it released
pub type ReleaseHook = Box<dyn FnMut() -> usize + Send>;

/// Reclaimer for the running platform
pub struct PlatformReclaimer {
    family: OsFamily,
    platform: Box<dyn ReclaimStep>,
    release_hooks: Vec<ReleaseHook>,
}

impl PlatformReclaimer {
    pub fn new() -> Self {
        Self::for_family(OsFamily::detect())
    }

    pub fn for_family(family: OsFamily) -> Self {
        Self::with_step(family, platform_step(family))
    }

    pub fn with_step(family: OsFamily, platform: Box<dyn ReclaimStep>) -> Self {
        log::debug!(
            "RAM reclaimer for {:?} using step '{}'",
            family,
            platform.name()
        );

        Self {
            family,
            platform,
            release_hooks: Vec::new(),
        }
    }

    /// Register an in-process hook run at the start of every pass
    pub fn add_release_hook(&mut self, hook: ReleaseHook) {
        self.release_hooks.push(hook);
    }

    pub fn family(&self) -> OsFamily {
        self.family
    }

    pub fn step_name(&self) -> &'static str {
        self.platform.name()
    }
}

impl Default for PlatformReclaimer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryReclaimer for PlatformReclaimer {
    fn reclaim(&mut self) -> bool {
        log::info!("RAM cleanup triggered (best-effort)");

        if !self.platform.supported() {
            log::info!("RAM cleanup not supported on this platform");
            return false;
        }

        let hooks = &mut self.release_hooks;
        let in_process = guarded("in-process release", || {
            let released: usize = hooks.iter_mut().map(|hook| hook()).sum();
            log::info!("In-process release freed {} cached entries", released);
            released > 0
        });

        let platform = &mut self.platform;
        let name = platform.name();
        let platform_ok = guarded(name, || platform.reclaim_step());

        if !platform_ok {
            log::info!("RAM cleanup step '{}' did not succeed", name);
        }

        in_process || platform_ok
    }
}

/// Run one step, turning a panic into a failed step
fn guarded<F>(name: &str, step: F) -> bool
where
    F: FnOnce() -> bool,
{
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(done) => done,
        Err(_) => {
            log::error!("RAM cleanup error: step '{}' panicked", name);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedStep {
        outcome: bool,
        calls: Arc<AtomicUsize>,
    }

    impl ReclaimStep for ScriptedStep {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn reclaim_step(&mut self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    struct PanickingStep;

    impl ReclaimStep for PanickingStep {
        fn name(&self) -> &'static str {
            "panicking"
        }

        fn reclaim_step(&mut self) -> bool {
            panic!("simulated fault")
        }
    }

    #[test]
    fn test_os_family_from_name() {
        assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_os_name("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("macos"), OsFamily::MacOs);
        assert_eq!(OsFamily::from_os_name("plan9"), OsFamily::Unknown);
    }

    #[test]
    fn test_unknown_platform_returns_false_without_steps() {
        let hook_calls = Arc::new(AtomicUsize::new(0));
        let counter = hook_calls.clone();

        let mut reclaimer = PlatformReclaimer::for_family(OsFamily::Unknown);
        reclaimer.add_release_hook(Box::new(move || counter.fetch_add(1, Ordering::SeqCst) + 1));

        assert_eq!(reclaimer.step_name(), "noop");
        assert!(!reclaimer.reclaim());
        assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_in_process_step_counts_as_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut reclaimer = PlatformReclaimer::with_step(
            OsFamily::Linux,
            Box::new(ScriptedStep {
                outcome: false,
                calls: calls.clone(),
            }),
        );
        reclaimer.add_release_hook(Box::new(|| 3));

        assert!(reclaimer.reclaim());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hooks_releasing_nothing_do_not_count() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut reclaimer = PlatformReclaimer::with_step(
            OsFamily::Linux,
            Box::new(ScriptedStep {
                outcome: false,
                calls: calls.clone(),
            }),
        );
        reclaimer.add_release_hook(Box::new(|| 0));

        assert!(!reclaimer.reclaim());

        // No hooks at all behaves the same
        let mut bare = PlatformReclaimer::with_step(
            OsFamily::Linux,
            Box::new(ScriptedStep {
                outcome: false,
                calls,
            }),
        );
        assert!(!bare.reclaim());
    }

    #[test]
    fn test_release_hook_shrinks_cache() {
        let cache = Arc::new(parking_lot::Mutex::new(Vec::<u64>::with_capacity(4096)));
        cache.lock().extend([1, 2, 3]);

        let mut reclaimer = PlatformReclaimer::with_step(
            OsFamily::Linux,
            Box::new(ScriptedStep {
                outcome: false,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );
        let shared = cache.clone();
        reclaimer.add_release_hook(Box::new(move || {
            let mut cache = shared.lock();
            let before = cache.capacity();
            cache.shrink_to_fit();
            before - cache.capacity()
        }));

        assert!(reclaimer.reclaim());
        assert_eq!(cache.lock().capacity(), 3);
    }

    #[test]
    fn test_platform_step_runs_even_after_hook_panics() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut reclaimer = PlatformReclaimer::with_step(
            OsFamily::Windows,
            Box::new(ScriptedStep {
                outcome: true,
                calls: calls.clone(),
            }),
        );
        reclaimer.add_release_hook(Box::new(|| panic!("hook fault")));

        assert!(reclaimer.reclaim());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_step_failing_returns_false() {
        let mut reclaimer = PlatformReclaimer::with_step(OsFamily::MacOs, Box::new(PanickingStep));
        reclaimer.add_release_hook(Box::new(|| panic!("hook fault")));

        assert!(!reclaimer.reclaim());
    }

    #[test]
    fn test_release_hooks_run_in_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut reclaimer = PlatformReclaimer::with_step(
            OsFamily::Linux,
            Box::new(ScriptedStep {
                outcome: true,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
        );

        for id in 0..3 {
            let order = order.clone();
            reclaimer.add_release_hook(Box::new(move || {
                if let Ok(mut seen) = order.lock() {
                    seen.push(id);
                }
                1
            }));
        }

        assert!(reclaimer.reclaim());
        assert_eq!(reclaimer.family(), OsFamily::Linux);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_native_reclaimer_never_panics() {
        let mut reclaimer = PlatformReclaimer::new();
        let _ = reclaimer.reclaim();
    }
}
