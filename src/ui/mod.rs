//! UI/Progress presentation layer
//!
//! This module handles:
//! - Progress reporting while components are installed
//! - A spinner while a remote source is fetched
//! - Colored status lines and the `--json` payload (see `display.rs`)
//!
//! All install progress goes through the [`ProgressReporter`] trait so the
//! installer never decides whether a terminal is attached.

pub mod display;

pub use display::Reporter;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter trait for long-running operations
pub trait ProgressReporter {
    /// Begin with the number of items to process
    fn start(&mut self, total: u64);

    /// Advance by one item
    fn step(&mut self, item: &str);

    fn finish(&mut self);
}

/// Interactive progress bar on stderr
pub struct InteractiveProgressReporter {
    bar: ProgressBar,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl Default for InteractiveProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&mut self, total: u64) {
        let style = ProgressStyle::with_template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        self.bar = ProgressBar::new(total);
        self.bar.set_style(style);
    }

    fn step(&mut self, item: &str) {
        // Truncate long names for display
        let shown = if item.chars().count() > 50 {
            let tail: String = item.chars().rev().take(47).collect::<Vec<_>>().into_iter().rev().collect();
            format!("...{tail}")
        } else {
            item.to_string()
        };
        self.bar.set_message(shown);
        self.bar.inc(1);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// No-op reporter for `--json`, non-terminal runs and tests
#[derive(Debug, Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _total: u64) {}

    fn step(&mut self, _item: &str) {}

    fn finish(&mut self) {}
}

/// Spinner shown while a blocking step runs. Hidden when `visible` is false.
pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
