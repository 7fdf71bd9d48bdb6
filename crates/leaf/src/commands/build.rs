//! `leaf build` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{ConfigArgs, load_sites};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Output directory for manifests (default: .leaf/build/).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site to build (default: all declared sites).
    #[arg(long)]
    site: Option<String>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(self.output_dir)?;
        let sites = load_sites(&config, self.site.as_deref())?;

        let output_dir = &config.docs_resolved.output_dir;
        output.status(&format!(
            "Source: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.status(&format!("Output: {}", output_dir.display()));

        for site in &sites {
            let broken = site.check().iter().filter(|i| i.is_fatal()).count();
            if broken > 0 {
                output.warn(&format!(
                    "Site \"{}\" has {broken} broken link(s), run `leaf check` for details",
                    site.name()
                ));
            }

            let path = site.write_manifest(output_dir)?;
            output.status(&format!("Wrote {}", path.display()));
        }

        output.done(&format!(
            "Built {} site(s) to {}",
            sites.len(),
            output_dir.display()
        ));
        Ok(())
    }
}
