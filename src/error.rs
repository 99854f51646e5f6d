use std::{io, path::PathBuf};

use thiserror::Error;

use crate::launcher::READY_TIMEOUT;

/// Problems with the command line. Always followed by the usage text.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("<OneNoteContentURL> argument is required.")]
    MissingArgument,
    #[error("The <OneNoteContentURL> must start with the 'onenote:' protocol.\n  Given URL: {0}")]
    InvalidScheme(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine the program's base directory: {0}")]
    BaseDirectory(#[source] io::Error),
    #[error("Unable to read the settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("The settings file '{}' is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: jsonc_parser::errors::ParseError,
    },
    #[error("The settings file '{}' must contain a JSON object.", path.display())]
    NotAnObject { path: PathBuf },
    #[error("The 'OneNoteExePath' setting is not set in the appSettings.json file ({}).", path.display())]
    MissingExePath { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum LaunchError {
    // The wording of this message is relied on by callers scripting the tool.
    #[error("Failed to start new OneNote application instance.")]
    NotStarted(#[source] Option<io::Error>),
    #[error("Timed-out waiting for new OneNote application instance (waited {} seconds).", READY_TIMEOUT.as_secs())]
    TimedOut,
    #[error("Unable to wait for new OneNote application instance to accept input: {0}")]
    Readiness(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl Error {
    /// Only command line problems re-print the usage text.
    pub fn shows_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}
