//! Operator-facing notices.
//!
//! The checker emits events through [`CheckReporter`]; [`ConsoleReporter`]
//! turns them into plain lines on stdout, coloured with `yansi` when colour
//! is enabled. Diagnostics go through `log` on stderr instead.

use yansi::Paint;

use crate::check::CheckSummary;

/// Callback for check run events.
///
/// Implement this trait to observe a run, e.g. to collect changed pages in
/// tests or to drive a different front end.
pub trait CheckReporter {
    /// Called for every page recorded with a new timestamp.
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key (working-directory-relative path) of the page
    fn on_page_changed(&self, key: &str);

    /// Called once after the cache has been written.
    fn on_complete(&self, _summary: &CheckSummary) {}
}

/// Reporter printing to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a console reporter. A quiet reporter prints nothing.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl CheckReporter for ConsoleReporter {
    fn on_page_changed(&self, key: &str) {
        if !self.quiet {
            println!("{}", changed_line(key));
        }
    }

    fn on_complete(&self, summary: &CheckSummary) {
        if !self.quiet {
            println!("{}", "Hash check complete.".green().bold());
            println!("{}", summary_line(summary));
        }
    }
}

/// Line printed for a changed page.
#[must_use]
pub fn changed_line(key: &str) -> String {
    format!("{} {}", "Updated:".yellow().bold(), key)
}

/// One-line run summary.
#[must_use]
pub fn summary_line(summary: &CheckSummary) -> String {
    format!(
        "{} page(s): {} changed, {} unchanged, {} removed",
        summary.pages,
        summary.changed.len(),
        summary.unchanged,
        summary.removed.len()
    )
}
