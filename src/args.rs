use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::error::UsageError;

pub const PROGRAM_NAME: &str = "OneNoteInstance";
pub const URL_VALUE_NAME: &str = "OneNoteContentURL";
pub const URL_SCHEME: &str = "onenote:";

const HELP_FLAGS: [&str; 3] = ["--help", "-h", "-?"];

/// A validated `onenote:` URL, kept exactly as it was passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUrl(String);

impl ContentUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Open(ContentUrl),
}

/// Turn raw OS arguments into text. Bytes that aren't valid Unicode become
/// U+FFFD, which still fails the scheme check and never matches a help flag.
pub fn from_os<I: IntoIterator<Item = OsString>>(args: I) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Classify the arguments (program name already stripped).
///
/// A help flag anywhere wins over everything else. Otherwise exactly one
/// argument is expected and it has to use the `onenote:` scheme.
pub fn validate(args: &[String]) -> Result<Invocation, UsageError> {
    if args.iter().any(|arg| HELP_FLAGS.contains(&arg.as_str())) {
        return Ok(Invocation::Help);
    }

    let [url] = args else {
        return Err(UsageError::MissingArgument);
    };

    if !has_scheme(url) {
        return Err(UsageError::InvalidScheme(url.clone()));
    }

    Ok(Invocation::Open(ContentUrl(url.clone())))
}

fn has_scheme(url: &str) -> bool {
    url.get(..URL_SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(URL_SCHEME))
}

fn command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Open OneNote content in a newly started OneNote application instance")
        .override_usage(format!("{PROGRAM_NAME} <{URL_VALUE_NAME}> [-?|-h|--help]"))
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("url")
                .value_name(URL_VALUE_NAME)
                .required(true)
                .help("The URL of the OneNote content to open. Must use the 'onenote:' protocol. Wrap the URL in quotation marks."),
        )
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help("Show this help message and exit (also -?)."),
        )
}

pub fn help_text() -> String {
    command().render_help().to_string()
}
