//! Best-effort busy indicator shown around blocking remote calls.

use std::cell::RefCell;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Start/stop contract for a transient activity indicator. A no-op
/// implementation is a legitimate one.
pub trait BusyIndicator {
    fn start(&self, message: &str);
    fn stop(&self);
}

/// Spinner rendered to stderr while a blocking call is outstanding.
#[derive(Default)]
pub struct TerminalSpinner {
    bar: RefCell<Option<ProgressBar>>,
}

impl TerminalSpinner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl BusyIndicator for TerminalSpinner {
    fn start(&self, message: &str) {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        *self.bar.borrow_mut() = Some(bar);
    }

    fn stop(&self) {
        if let Some(bar) = self.bar.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

/// Indicator that does nothing; used in tests and non-interactive runs.
pub struct NoopIndicator;

impl BusyIndicator for NoopIndicator {
    fn start(&self, _message: &str) {}
    fn stop(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_indicator_is_inert() {
        let spinner = NoopIndicator;
        spinner.start("working");
        spinner.stop();
    }

    #[test]
    fn test_terminal_spinner_stop_without_start() {
        let spinner = TerminalSpinner::new();
        spinner.stop();
    }

    #[test]
    fn test_terminal_spinner_start_stop() {
        let spinner = TerminalSpinner::new();
        spinner.start("fetching");
        spinner.stop();
        assert!(spinner.bar.borrow().is_none());
    }
}
