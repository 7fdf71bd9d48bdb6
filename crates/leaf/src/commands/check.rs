//! `leaf check` command implementation.

use clap::Args;

use super::{ConfigArgs, load_sites};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Site to check (default: all declared sites).
    #[arg(long)]
    site: Option<String>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any link is broken.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(None)?;
        let sites = load_sites(&config, self.site.as_deref())?;

        output.status(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));

        let mut broken = 0;
        for site in &sites {
            output.site_heading(site);

            for issue in site.check() {
                if issue.is_fatal() {
                    broken += 1;
                }
                output.issue(&issue);
            }
        }

        if broken > 0 {
            return Err(CliError::Validation(format!(
                "{broken} broken link(s) found"
            )));
        }

        output.done("All navigation links resolve");
        Ok(())
    }
}
