//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Per-version detail, including skipped versions.
    Verbose,
    /// Results and progress.
    #[default]
    Normal,
    /// Errors only.
    Quiet,
}

impl OutputMode {
    /// Pick a mode from the global flags. Quiet wins over verbose.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows status messages.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if this mode shows per-version detail.
    pub fn shows_detail(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress bars.
    pub fn shows_progress(&self) -> bool {
        self.shows_status()
    }
}
