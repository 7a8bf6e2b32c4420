//! Batch progress display.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar counting gems through a batch run.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a visible progress bar over `total` items.
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.red} [{bar:30.red/dim}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Create a bar that doesn't show (for quiet mode and tests).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Show what is being processed.
    pub fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    /// Print a line above the bar without corrupting it.
    pub fn println(&self, msg: &str) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar.println(msg);
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
