//! glibc heap trimming.

use super::ReclaimStep;

type MallocTrim = unsafe extern "C" fn(libc::size_t) -> libc::c_int;

/// Calls `malloc_trim(0)` if the loaded libc exports it.
///
/// The symbol is resolved at runtime so the binary still runs (and the step
/// just reports failure) on libcs without it, such as musl.
pub struct AllocatorTrim;

impl AllocatorTrim {
    fn resolve() -> Option<MallocTrim> {
        // SAFETY: the name is NUL-terminated and RTLD_DEFAULT searches the
        // objects already loaded into this process.
        let symbol = unsafe { libc::dlsym(libc::RTLD_DEFAULT, b"malloc_trim\0".as_ptr().cast()) };
        if symbol.is_null() {
            return None;
        }

        // SAFETY: glibc declares `int malloc_trim(size_t pad)`.
        Some(unsafe { std::mem::transmute::<*mut libc::c_void, MallocTrim>(symbol) })
    }
}

impl ReclaimStep for AllocatorTrim {
    fn name(&self) -> &'static str {
        "malloc_trim"
    }

    fn reclaim_step(&mut self) -> bool {
        let Some(malloc_trim) = Self::resolve() else {
            log::debug!("malloc_trim is not exported by this libc");
            return false;
        };

        // SAFETY: resolved above; a zero pad is always valid.
        let released = unsafe { malloc_trim(0) };
        log::info!("Linux malloc_trim executed (memory released: {})", released != 0);
        true
    }
}
