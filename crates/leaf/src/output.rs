//! Terminal reporting for leaf commands.
//!
//! Progress and diagnostics go to stderr. Resolved pages go to stdout as
//! JSON so `leaf resolve` can be piped into other tools.

use console::{Term, style};
use leaf_site::{IntegrityIssue, PageView, Site};

use crate::error::CliError;

pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
        }
    }

    /// Plain progress line.
    pub(crate) fn status(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    /// Section heading naming a site, its page count and its components.
    pub(crate) fn site_heading(&self, site: &Site) {
        let components = site.registry().components();
        let components = if components.is_empty() {
            String::new()
        } else {
            format!(", components: {}", components.join(", "))
        };
        let heading = format!(
            "Site \"{}\" ({} pages{components})",
            site.name(),
            site.content().len()
        );
        self.status(&style(heading).cyan().bold().to_string());
    }

    /// One integrity issue, red when it fails the check.
    pub(crate) fn issue(&self, issue: &IntegrityIssue) {
        let text = format!("  {issue}");
        if issue.is_fatal() {
            self.status(&style(text).red().to_string());
        } else {
            self.status(&style(text).yellow().to_string());
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        self.status(&style(msg).yellow().to_string());
    }

    pub(crate) fn done(&self, msg: &str) {
        self.status(&style(msg).green().to_string());
    }

    /// Final error before exiting.
    pub(crate) fn failure(&self, err: &CliError) {
        self.status(&style(format!("Error: {err}")).red().to_string());
    }

    /// Print a resolved page as pretty JSON on stdout.
    pub(crate) fn page(&self, view: &PageView) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string_pretty(view)?;
        let _ = self.stdout.write_line(&json);
        Ok(())
    }
}
