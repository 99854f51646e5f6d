use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use onenote_instance::{
    dispatch::UrlDispatcher,
    error::{ConfigError, LaunchError},
    launcher::{Launcher, Readiness},
    run, ExitStatus,
};

const URL: &str = "onenote:https://example/notebook";

/// What the fake OS does when asked to start a process.
#[derive(Clone, Copy)]
enum Behaviour {
    Ready,
    NoHandle,
    NeverIdle,
}

struct FakeLauncher {
    behaviour: Behaviour,
    started: Vec<PathBuf>,
    waited: Vec<Duration>,
}

impl FakeLauncher {
    fn new(behaviour: Behaviour) -> Self {
        FakeLauncher {
            behaviour,
            started: Vec::new(),
            waited: Vec::new(),
        }
    }
}

impl Launcher for FakeLauncher {
    type Handle = ();

    fn start_process(&mut self, path: &Path) -> Result<(), LaunchError> {
        self.started.push(path.to_path_buf());
        match self.behaviour {
            Behaviour::NoHandle => Err(LaunchError::NotStarted(None)),
            Behaviour::Ready | Behaviour::NeverIdle => Ok(()),
        }
    }

    fn wait_until_ready(&mut self, _handle: &mut (), timeout: Duration) -> Result<Readiness, LaunchError> {
        self.waited.push(timeout);
        match self.behaviour {
            Behaviour::NeverIdle => Ok(Readiness::TimedOut),
            _ => Ok(Readiness::Ready),
        }
    }
}

#[derive(Default)]
struct RecordingDispatcher {
    opened: RefCell<Vec<String>>,
}

impl UrlDispatcher for RecordingDispatcher {
    fn open_best_effort(&self, url: &str) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

struct Outcome {
    status: ExitStatus,
    stdout: String,
    stderr: String,
    launcher: FakeLauncher,
    opened: Vec<String>,
}

fn settings(contents: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("appSettings.json"), contents).unwrap();
    dir
}

fn invoke(args: &[&str], base_dir: &Path, behaviour: Behaviour) -> Outcome {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let mut launcher = FakeLauncher::new(behaviour);
    let dispatcher = RecordingDispatcher::default();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let status = run(
        &args,
        || Ok(base_dir.to_path_buf()),
        &mut launcher,
        &dispatcher,
        &mut stdout,
        &mut stderr,
    )
    .unwrap();

    Outcome {
        status,
        stdout: String::from_utf8(stdout).unwrap(),
        stderr: String::from_utf8(stderr).unwrap(),
        launcher,
        opened: dispatcher.opened.into_inner(),
    }
}

fn valid_settings() -> tempfile::TempDir {
    settings(r#"{ "OneNoteExePath": "/path/to/app" }"#)
}

#[test]
fn test_success_dispatches_url_unchanged() {
    let dir = valid_settings();
    let outcome = invoke(&[URL], dir.path(), Behaviour::Ready);

    assert_eq!(outcome.status, ExitStatus::Success);
    assert_eq!(outcome.status.code(), 0);
    assert_eq!(outcome.launcher.started, vec![PathBuf::from("/path/to/app")]);
    assert_eq!(outcome.launcher.waited, vec![Duration::from_millis(15000)]);
    assert_eq!(outcome.opened, vec![URL.to_string()]);
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.is_empty());
}

#[test]
fn test_help_wins_over_everything() {
    let dir = tempfile::tempdir().unwrap();
    for args in [&["-?"][..], &["--help"], &["not-a-url", "-h"], &[URL, "extra", "--help"]] {
        let outcome = invoke(args, dir.path(), Behaviour::Ready);
        assert_eq!(outcome.status, ExitStatus::Success);
        assert!(outcome.stdout.contains("Usage:"));
        assert!(outcome.stderr.is_empty());
        assert!(outcome.launcher.started.is_empty());
        assert!(outcome.opened.is_empty());
    }
}

#[test]
fn test_help_does_not_need_base_dir() {
    let mut launcher = FakeLauncher::new(Behaviour::Ready);
    let status = run(
        &["-h".to_string()],
        || panic!("base directory looked up for a help request"),
        &mut launcher,
        &RecordingDispatcher::default(),
        &mut Vec::<u8>::new(),
        &mut Vec::<u8>::new(),
    )
    .unwrap();
    assert_eq!(status, ExitStatus::Success);
}

#[test]
fn test_wrong_argument_count() {
    let dir = valid_settings();
    for args in [&[] as &[&str], &[URL, URL]] {
        let outcome = invoke(args, dir.path(), Behaviour::Ready);
        assert_eq!(outcome.status.code(), 1);
        assert!(outcome.stderr.contains("<OneNoteContentURL> argument is required."));
        assert!(outcome.stdout.contains("Usage:"));
        assert!(outcome.launcher.started.is_empty());
    }
}

#[test]
fn test_wrong_scheme_names_the_value() {
    let dir = valid_settings();
    let outcome = invoke(&["https://example/notebook"], dir.path(), Behaviour::Ready);
    assert_eq!(outcome.status, ExitStatus::Failure);
    assert!(outcome.stderr.contains("https://example/notebook"));
    assert!(outcome.stdout.contains("Usage:"));
    assert!(outcome.opened.is_empty());
}

#[test]
fn test_missing_exe_path_setting() {
    let dir = settings(r#"{ "SomethingElse": "x" }"#);
    let outcome = invoke(&[URL], dir.path(), Behaviour::Ready);
    assert_eq!(outcome.status, ExitStatus::Failure);
    assert!(outcome.stderr.contains("OneNoteExePath"));
    assert!(outcome.stdout.is_empty());
    assert!(outcome.launcher.started.is_empty());
}

#[test]
fn test_missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = invoke(&[URL], dir.path(), Behaviour::Ready);
    assert_eq!(outcome.status, ExitStatus::Failure);
    assert!(outcome.stderr.contains("appSettings.json"));
    assert!(outcome.stdout.is_empty());
}

#[test]
fn test_base_dir_failure() {
    let mut launcher = FakeLauncher::new(Behaviour::Ready);
    let mut stderr = Vec::new();
    let status = run(
        &[URL.to_string()],
        || Err(ConfigError::BaseDirectory(std::io::Error::other("no exe"))),
        &mut launcher,
        &RecordingDispatcher::default(),
        &mut Vec::<u8>::new(),
        &mut stderr,
    )
    .unwrap();
    assert_eq!(status, ExitStatus::Failure);
    assert!(String::from_utf8(stderr).unwrap().contains("no exe"));
}

#[test]
fn test_no_process_handle() {
    let dir = valid_settings();
    let outcome = invoke(&[URL], dir.path(), Behaviour::NoHandle);
    assert_eq!(outcome.status.code(), 1);
    assert_eq!(outcome.stderr, "Failed to start new OneNote application instance.\n");
    assert!(outcome.stdout.is_empty());
    assert!(outcome.launcher.waited.is_empty());
    assert!(outcome.opened.is_empty());
}

#[test]
fn test_readiness_timeout() {
    let dir = valid_settings();
    let outcome = invoke(&[URL], dir.path(), Behaviour::NeverIdle);
    assert_eq!(outcome.status.code(), 1);
    assert!(outcome.stderr.contains("15 seconds"));
    assert!(outcome.stdout.is_empty());
    assert!(outcome.opened.is_empty());
}

#[cfg(unix)]
#[test]
fn test_non_unicode_argument_fails_cleanly() {
    use std::{ffi::OsString, os::unix::ffi::OsStringExt};

    let dir = valid_settings();
    let args = onenote_instance::args::from_os([OsString::from_vec(vec![0xff])]);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = invoke(&args, dir.path(), Behaviour::Ready);
    assert_eq!(outcome.status.code(), 1);
    assert!(outcome.stderr.contains("Given URL: \u{fffd}"));
    assert!(outcome.stdout.contains("Usage:"));
    assert!(outcome.launcher.started.is_empty());
}
