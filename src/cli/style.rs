//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Extension methods for the CLI's standard text styles
///
/// Styling always emits ANSI codes; anstream strips them when the target
/// stream has no color support or --no-color forced it off.
pub trait Stylize: std::fmt::Display + Sized {
    /// De-emphasized secondary text
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Headline emphasis
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Identifiers and values
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Positive outcomes
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Things needing attention but not failed
    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    /// Failures
    fn error(&self) -> String {
        self.red().to_string()
    }
}

impl<T: std::fmt::Display> Stylize for T {}

/// Style for the repository progress bar
pub fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{bar:24}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
