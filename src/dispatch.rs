/// Hands a URL to whatever the OS has registered for its scheme.
///
/// There is deliberately no result: by the time we dispatch, the new
/// application instance is already running, and whether the shell manages
/// to route the URL to it is not reported back to the caller.
pub trait UrlDispatcher {
    fn open_best_effort(&self, url: &str);
}

/// Opens through the desktop shell (`ShellExecute`, `xdg-open`, `open`).
#[derive(Debug, Default)]
pub struct ShellDispatcher;

impl UrlDispatcher for ShellDispatcher {
    fn open_best_effort(&self, url: &str) {
        if let Err(e) = open::that_detached(url) {
            log::debug!("Opening {url} failed: {e}");
        }
    }
}
