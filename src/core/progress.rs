//! Terminal progress for the slow phases of a run: tracker fetches and the
//! per-release replay. Nothing is drawn unless stderr is a terminal.

use indicatif::{ProgressBar, ProgressStyle};

pub mod styles {
    use super::*;

    /// Bar style for the per-release reconstruction walk.
    pub fn release_progress() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold} {wide_bar:.cyan/blue} {pos}/{len} releases ({elapsed}) {msg}")
            .expect("valid template")
            .progress_chars("##-")
    }

    /// Spinner style for remote fetches of unknown length.
    pub fn spinner() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .expect("valid template")
    }
}

pub fn is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

/// Create a release progress bar, hidden when stderr is not a TTY.
pub fn create_progress(total: usize, prefix: &str) -> ProgressBar {
    if is_tty() {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(styles::release_progress());
        bar.set_prefix(prefix.to_string());
        bar
    } else {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        bar
    }
}

/// Create a spinner for indeterminate operations.
pub fn create_spinner(message: &str) -> ProgressBar {
    if is_tty() {
        let bar = ProgressBar::new_spinner();
        bar.set_style(styles::spinner());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar
    } else {
        ProgressBar::hidden()
    }
}
