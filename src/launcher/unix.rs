use std::{
    io,
    os::unix::process::CommandExt,
    path::Path,
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use super::{x11::WindowWatcher, Launcher, Readiness};
use crate::error::LaunchError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns the executable in its own process group with no stdio attached.
///
/// Readiness means the process has mapped a window the window manager knows
/// about. Without an X display (or without an EWMH window manager) a
/// successful spawn is all we can check.
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    type Handle = Child;

    fn start_process(&mut self, path: &Path) -> Result<Child, LaunchError> {
        let child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| LaunchError::NotStarted(Some(e)))?;
        log::debug!("Spawned process {}", child.id());
        Ok(child)
    }

    fn wait_until_ready(&mut self, child: &mut Child, timeout: Duration) -> Result<Readiness, LaunchError> {
        let pid = child.id();
        let watcher = match WindowWatcher::connect() {
            Ok(watcher) => watcher,
            Err(e) => {
                log::debug!("Can't watch for windows ({e}), treating process {pid} as ready");
                return Ok(Readiness::Ready);
            }
        };

        let deadline = Instant::now() + timeout;
        loop {
            let found = watcher
                .has_window_for(pid)
                .map_err(|e| LaunchError::Readiness(io::Error::other(e.to_string())))?;
            if found {
                return Ok(Readiness::Ready);
            }

            // Single-instance apps may forward to an existing instance and quit.
            // Nothing is left to wait for in that case.
            if let Some(status) = child.try_wait().map_err(LaunchError::Readiness)? {
                log::debug!("Process {pid} exited ({status}) before showing a window");
                return Ok(Readiness::Ready);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Readiness::TimedOut);
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        }
    }
}
