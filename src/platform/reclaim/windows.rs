//! Working-set trimming through psapi.

use windows_sys::Win32::Foundation::CloseHandle;
use windows_sys::Win32::System::ProcessStatus::{K32EmptyWorkingSet, K32EnumProcesses};
use windows_sys::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_SET_QUOTA,
};

use super::ReclaimStep;

const INITIAL_PID_CAPACITY: usize = 1024;

/// Asks Windows to trim the working set of every process we are allowed
/// to open. Processes owned by other users or protected by the OS refuse
/// the handle and are skipped.
pub struct WorkingSetTrim;

impl WorkingSetTrim {
    fn process_ids() -> Vec<u32> {
        let mut pids = vec![0u32; INITIAL_PID_CAPACITY];

        loop {
            let capacity_bytes = (pids.len() * std::mem::size_of::<u32>()) as u32;
            let mut needed_bytes = 0u32;

            // SAFETY: the buffer is valid for `capacity_bytes` bytes.
            let ok = unsafe { K32EnumProcesses(pids.as_mut_ptr(), capacity_bytes, &mut needed_bytes) };
            if ok == 0 {
                return Vec::new();
            }

            // A full buffer may mean it was too small
            if needed_bytes < capacity_bytes {
                pids.truncate(needed_bytes as usize / std::mem::size_of::<u32>());
                return pids;
            }
            pids.resize(pids.len() * 2, 0);
        }
    }

    fn trim(pid: u32) -> bool {
        // SAFETY: OpenProcess has no memory preconditions; a null handle
        // means access was refused.
        let handle = unsafe { OpenProcess(PROCESS_SET_QUOTA | PROCESS_QUERY_INFORMATION, 0, pid) };
        if handle.is_null() {
            return false;
        }

        // SAFETY: `handle` is a valid process handle until closed below.
        let trimmed = unsafe { K32EmptyWorkingSet(handle) } != 0;
        unsafe {
            CloseHandle(handle);
        }
        trimmed
    }
}

impl ReclaimStep for WorkingSetTrim {
    fn name(&self) -> &'static str {
        "working-set-trim"
    }

    fn reclaim_step(&mut self) -> bool {
        let count = Self::process_ids()
            .into_iter()
            .filter(|&pid| pid != 0 && Self::trim(pid))
            .count();

        if count > 0 {
            log::info!("Trimmed working set for {} processes", count);
            return true;
        }
        false
    }
}
