//! Open `onenote:` content in a freshly started OneNote instance.
//!
//! When OneNote is already running, the shell routes `onenote:` URLs to the
//! running instance. Starting a new instance first and dispatching the URL
//! only once it accepts input makes the new instance the one that opens it.

pub mod args;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod launcher;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use crate::args::{ContentUrl, Invocation};
use crate::dispatch::UrlDispatcher;
use crate::error::{ConfigError, Error};
use crate::launcher::Launcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

/// Run the whole tool once.
///
/// `args` excludes the program name. `base_dir` is only consulted once the
/// arguments are valid. Usage goes to `stdout`, errors to `stderr`; on success
/// nothing is written at all.
pub fn run<L, D>(
    args: &[String],
    base_dir: impl FnOnce() -> Result<PathBuf, ConfigError>,
    launcher: &mut L,
    dispatcher: &D,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<ExitStatus>
where
    L: Launcher,
    D: UrlDispatcher,
{
    let url = match args::validate(args) {
        Ok(Invocation::Help) => {
            write!(stdout, "{}", args::help_text())?;
            return Ok(ExitStatus::Success);
        }
        Ok(Invocation::Open(url)) => url,
        Err(e) => return report(e.into(), stdout, stderr),
    };

    match open_in_new_instance(&url, base_dir, launcher, dispatcher) {
        Ok(()) => Ok(ExitStatus::Success),
        Err(e) => report(e, stdout, stderr),
    }
}

fn open_in_new_instance<L: Launcher, D: UrlDispatcher>(
    url: &ContentUrl,
    base_dir: impl FnOnce() -> Result<PathBuf, ConfigError>,
    launcher: &mut L,
    dispatcher: &D,
) -> Result<(), Error> {
    let exe = config::load_exe_path(&base_dir()?)?;
    launcher::launch(launcher, &exe)?;

    // The new instance is the most recent one now, so the shell routes the
    // URL to it.
    dispatcher.open_best_effort(url.as_str());
    Ok(())
}

fn report(e: Error, stdout: &mut impl Write, stderr: &mut impl Write) -> io::Result<ExitStatus> {
    log::debug!("Failing with {e:?}");
    writeln!(stderr, "{e}")?;
    if e.shows_usage() {
        write!(stdout, "{}", args::help_text())?;
    }
    Ok(ExitStatus::Failure)
}
