//! `leaf resolve` command implementation.

use clap::Args;
use leaf_config::Config;
use leaf_site::Site;

use super::ConfigArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Page path (e.g. `/posts/harmonyos/Articles/Navigation`).
    path: String,

    #[command(flatten)]
    config: ConfigArgs,

    /// Site to resolve against (required when several sites are declared).
    #[arg(long)]
    site: Option<String>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// Prints the resolved page as JSON on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the site is ambiguous.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.config.load(None)?;
        let site = selected_site(&config, self.site.as_deref())?;

        let view = site.resolve(&self.path);
        if !view.exists {
            output.warn(&format!("No document found for {}", view.path));
        }

        output.page(&view)?;
        Ok(())
    }
}

/// Load the one site `resolve` works against.
fn selected_site(config: &Config, name: Option<&str>) -> Result<Site, CliError> {
    let (name, site_config) = config.select_site(name)?;
    Ok(Site::load(
        name,
        site_config,
        &config.layouts,
        &config.docs_resolved.source_dir,
    )?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use leaf_config::ConfigError;
    use leaf_site::LayoutVariant;

    use super::*;

    fn config(toml: &str) -> (tempfile::TempDir, Config) {
        let temp_dir = tempfile::tempdir().unwrap();
        let docs = temp_dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        fs::write(docs.join("index.md"), "---\nlayout: bento\n---\n").unwrap();
        let config = Config::from_toml_str(toml, temp_dir.path()).unwrap();
        (temp_dir, config)
    }

    #[test]
    fn test_selected_site_single() {
        let (_dir, config) = config(
            r#"
[layouts]
bento = "CustomHome"

[sites.en]
title = "Blog"
lang = "en-GB"
"#,
        );

        let site = selected_site(&config, None).unwrap();

        assert_eq!(site.name(), "en");
        assert_eq!(site.config().lang, "en-GB");
        assert_eq!(
            site.resolve("/").layout,
            LayoutVariant::Named("CustomHome".to_owned())
        );
    }

    #[test]
    fn test_selected_site_ambiguous() {
        let (_dir, config) = config(
            r#"
[sites.en]
title = "Blog"

[sites.zh]
title = "博客"
"#,
        );

        assert!(matches!(
            selected_site(&config, None),
            Err(CliError::Config(ConfigError::Validation(_)))
        ));
        assert_eq!(selected_site(&config, Some("zh")).unwrap().name(), "zh");
    }
}
