use std::error::Error;

use simple_error::bail;
use x11rb::{
    connection::Connection,
    protocol::xproto::{get_property, intern_atom, Atom, AtomEnum, Window},
    rust_connection::RustConnection,
};

const CLIENT_LIST_STR: &str = "_NET_CLIENT_LIST";
const WM_PID_STR: &str = "_NET_WM_PID";
const MAX_CLIENTS: u32 = 4096;

fn intern(conn: &RustConnection, string: &str) -> Result<Atom, Box<dyn Error>> {
    Ok(intern_atom(conn, false, string.as_bytes())?.reply()?.atom)
}

/// Looks for top-level windows belonging to a process, using the window
/// manager's client list. Mapping a managed window is as close as X11 gets
/// to "ready for input".
pub struct WindowWatcher {
    conn: RustConnection,
    root: Window,
    // Interned once up front, every poll uses them
    client_list_atom: Atom,
    pid_atom: Atom,
}

impl WindowWatcher {
    pub fn connect() -> Result<Self, Box<dyn Error>> {
        let (conn, screen_num) = RustConnection::connect(None)?;
        let root = conn.setup().roots[screen_num].root;
        let client_list_atom = intern(&conn, CLIENT_LIST_STR)?;
        let pid_atom = intern(&conn, WM_PID_STR)?;

        let watcher = WindowWatcher {
            conn,
            root,
            client_list_atom,
            pid_atom,
        };

        // No EWMH window manager, nothing to watch
        if watcher.client_windows()?.is_none() {
            bail!("the window manager does not publish {}", CLIENT_LIST_STR);
        }

        Ok(watcher)
    }

    fn client_windows(&self) -> Result<Option<Vec<Window>>, Box<dyn Error>> {
        let reply = get_property(
            &self.conn,
            false,
            self.root,
            self.client_list_atom,
            AtomEnum::WINDOW,
            0,
            MAX_CLIENTS,
        )?
        .reply()?;
        let windows = reply.value32().map(|windows| windows.collect());
        Ok(windows)
    }

    fn window_pid(&self, window: Window) -> Result<Option<u32>, Box<dyn Error>> {
        let cookie = get_property(&self.conn, false, window, self.pid_atom, AtomEnum::CARDINAL, 0, 1)?;
        // The window may be gone by the time we ask about it.
        Ok(cookie
            .reply()
            .ok()
            .and_then(|reply| reply.value32().and_then(|mut pids| pids.next())))
    }

    pub fn has_window_for(&self, pid: u32) -> Result<bool, Box<dyn Error>> {
        for window in self.client_windows()?.unwrap_or_default() {
            if self.window_pid(window)? == Some(pid) {
                log::debug!("Found window {window:#x} for process {pid}");
                return Ok(true);
            }
        }
        Ok(false)
    }
}
