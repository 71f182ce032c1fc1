use std::borrow::Cow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.cyan} {msg} {elapsed:.dim}";

/// Spinner drawn on stderr while the model downloads and loads.
///
/// Cleared when dropped if it was never finished.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        let progress_bar = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(message);
        progress_bar.enable_steady_tick(Duration::from_millis(100));

        Self { progress_bar }
    }

    /// Replaces the spinner with a summary line.
    pub fn finish(&self, line: &str) {
        self.progress_bar.finish_and_clear();
        eprintln!("{line}");
    }

    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}
