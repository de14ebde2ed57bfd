//! Unified UI output interface.
//!
//! Status lines go to stderr so that command results on stdout (resolved
//! URLs, hashes) stay pipeable.

use std::io::{IsTerminal, Write};

use crossterm::style::{Color, Stylize};

use super::theme::Theme;

/// A cloneable handle for printing styled status messages.
#[derive(Debug, Clone)]
pub struct Output {
    theme: Theme,
    quiet: bool,
    color: bool,
}

impl Output {
    /// Create a new output handle.
    pub fn new(quiet: bool) -> Self {
        Self {
            theme: Theme::default(),
            quiet,
            color: std::io::stderr().is_terminal(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Paint `text` if stderr is a terminal.
    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&self, icon: &str, color: Color, msg: &str) {
        let _ = writeln!(std::io::stderr(), "{} {msg}", self.paint(icon, color));
    }

    /// Prints an informational message to the console.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            self.line(self.theme.icons.info, self.theme.colors.secondary, msg);
        }
    }

    /// Prints an in-progress step.
    pub fn step(&self, msg: &str) {
        if !self.quiet {
            self.line(self.theme.icons.active, self.theme.colors.active, msg);
        }
    }

    /// Prints a success message to the console.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            self.line(self.theme.icons.success, self.theme.colors.success, msg);
        }
    }

    /// Prints a warning message to the console.
    pub fn warning(&self, msg: &str) {
        self.line(self.theme.icons.warning, self.theme.colors.warning, msg);
    }

    /// Prints an error message to the console.
    pub fn error(&self, msg: &str) {
        self.line(self.theme.icons.error, self.theme.colors.error, msg);
    }

    /// Rewrites the current stderr line (progress bars). No-op when piped.
    pub fn progress(&self, msg: &str) {
        if self.quiet || !self.color {
            return;
        }
        let mut err = std::io::stderr();
        let _ = write!(err, "\r\x1b[2K  {msg}");
        let _ = err.flush();
    }

    /// Ends a line started by [`Output::progress`].
    pub fn end_progress(&self) {
        if self.quiet || !self.color {
            return;
        }
        let _ = write!(std::io::stderr(), "\r\x1b[2K");
    }
}
