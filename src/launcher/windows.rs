use std::{ffi::OsStr, io, iter, mem, os::windows::ffi::OsStrExt, path::Path, time::Duration};

use windows_sys::Win32::{
    Foundation::{CloseHandle, HANDLE, WAIT_FAILED, WAIT_TIMEOUT},
    UI::{
        Shell::{
            ShellExecuteExW, SEE_MASK_FLAG_DDEWAIT, SEE_MASK_FLAG_NO_UI, SEE_MASK_NOCLOSEPROCESS,
            SHELLEXECUTEINFOW,
        },
        WindowsAndMessaging::{WaitForInputIdle, SW_SHOWNORMAL},
    },
};

use super::{Launcher, Readiness};
use crate::error::LaunchError;

/// Launches through the Windows shell, the same way double-clicking the
/// executable would, and waits with `WaitForInputIdle`.
#[derive(Debug, Default)]
pub struct SystemLauncher;

// Closes the process handle, the process itself keeps running.
pub struct ProcessHandle(HANDLE);

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        unsafe {
            CloseHandle(self.0);
        }
    }
}

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(iter::once(0)).collect()
}

impl Launcher for SystemLauncher {
    type Handle = ProcessHandle;

    fn start_process(&mut self, path: &Path) -> Result<ProcessHandle, LaunchError> {
        let file = wide(path.as_os_str());

        let mut info: SHELLEXECUTEINFOW = unsafe { mem::zeroed() };
        info.cbSize = mem::size_of::<SHELLEXECUTEINFOW>() as u32;
        info.fMask = SEE_MASK_NOCLOSEPROCESS | SEE_MASK_FLAG_DDEWAIT | SEE_MASK_FLAG_NO_UI;
        info.lpFile = file.as_ptr();
        info.nShow = SW_SHOWNORMAL;

        if unsafe { ShellExecuteExW(&mut info) } == 0 {
            return Err(LaunchError::NotStarted(Some(io::Error::last_os_error())));
        }

        // The shell may hand the request to an existing process (DDE) and
        // give us nothing to wait on.
        if info.hProcess.is_null() {
            return Err(LaunchError::NotStarted(None));
        }

        Ok(ProcessHandle(info.hProcess))
    }

    fn wait_until_ready(
        &mut self,
        handle: &mut ProcessHandle,
        timeout: Duration,
    ) -> Result<Readiness, LaunchError> {
        // INFINITE is u32::MAX, stay below it.
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX - 1);

        match unsafe { WaitForInputIdle(handle.0, millis) } {
            0 => Ok(Readiness::Ready),
            WAIT_TIMEOUT => Ok(Readiness::TimedOut),
            WAIT_FAILED => Err(LaunchError::Readiness(io::Error::last_os_error())),
            other => Err(LaunchError::Readiness(io::Error::other(format!(
                "unexpected WaitForInputIdle result {other:#x}"
            )))),
        }
    }
}
