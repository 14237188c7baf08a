//! Output formatting and progress indicators
//!
//! Terminal rendering for progress and errors. All of this is cosmetic;
//! components only see the [`ProgressSink`] trait.

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::context::{NullSink, ProgressHandle, ProgressSink};

/// Progress sink rendering indicatif bars on the terminal
pub struct TerminalSink;

struct TerminalHandle {
    bar: ProgressBar,
}

impl ProgressSink for TerminalSink {
    fn start(&self, message: &str, total: u64) -> Box<dyn ProgressHandle> {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓▒░"),
        );
        bar.set_message(message.to_string());
        Box::new(TerminalHandle { bar })
    }
}

impl ProgressHandle for TerminalHandle {
    fn set(&self, position: u64) {
        self.bar.set_position(position);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Pick a progress sink for the current run
///
/// Quiet runs and non-terminal output get the no-op sink.
pub fn select_sink(quiet: bool) -> Box<dyn ProgressSink> {
    use std::io::IsTerminal;
    if quiet || !std::io::stdout().is_terminal() {
        Box::new(NullSink)
    } else {
        Box::new(TerminalSink)
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix
    pub const SUCCESS: &str = "✓";

    /// Error prefix
    pub const ERROR: &str = "✗";

    /// Interrupted prefix
    pub const INTERRUPTED: &str = "✖";
}

/// Print one top-level error message
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_sink_handles_lifecycle() {
        let sink = TerminalSink;
        let handle = sink.start("working", 10);
        handle.set(3);
        handle.set(10);
        handle.finish();
    }
}
