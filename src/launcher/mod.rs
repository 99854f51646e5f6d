use std::{path::Path, time::Duration};

use crate::error::LaunchError;

#[cfg(unix)]
mod unix;
#[cfg(unix)]
mod x11;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::SystemLauncher;
#[cfg(windows)]
pub use windows::SystemLauncher;

pub const READY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    TimedOut,
}

/// Starting a process and waiting for it to accept input.
///
/// Dropping a handle releases it but never terminates the process: the
/// started application is expected to outlive us.
pub trait Launcher {
    type Handle;

    fn start_process(&mut self, path: &Path) -> Result<Self::Handle, LaunchError>;

    fn wait_until_ready(
        &mut self,
        handle: &mut Self::Handle,
        timeout: Duration,
    ) -> Result<Readiness, LaunchError>;
}

/// Start `path` and block until it is ready for input or `READY_TIMEOUT` passes.
pub fn launch<L: Launcher>(launcher: &mut L, path: &Path) -> Result<(), LaunchError> {
    let mut handle = launcher.start_process(path)?;
    log::debug!("Started {}, waiting up to {:?} for it to become ready", path.display(), READY_TIMEOUT);

    match launcher.wait_until_ready(&mut handle, READY_TIMEOUT)? {
        Readiness::Ready => Ok(()),
        Readiness::TimedOut => Err(LaunchError::TimedOut),
    }
}
