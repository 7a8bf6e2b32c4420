//! Terminal output for the CLI.
//!
//! This module provides:
//! - [`UserInterface`] trait so commands can be tested against [`MockUI`]
//! - [`TerminalUI`] for real terminal usage
//! - [`BatchProgress`] for counting versions through a batch run
//!
//! # Example
//!
//! ```
//! use gemlibs::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("pg 1.5.4: postgresql");
//! assert_eq!(ui.successes(), ["pg 1.5.4: postgresql"]);
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use progress::{format_duration, BatchProgress};
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, GemlibsTheme};

/// Trait for user-facing output.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a message only in verbose mode.
    fn detail(&mut self, msg: &str) {
        if self.output_mode().shows_detail() {
            self.message(msg);
        }
    }

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Note work that was already done. Verbose only.
    fn skipped(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header line.
    fn show_header(&mut self, title: &str);

    /// Start a progress bar over `total` items.
    fn start_progress(&mut self, total: u64) -> BatchProgress;
}
