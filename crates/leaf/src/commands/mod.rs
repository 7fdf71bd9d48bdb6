//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod resolve;

use std::path::PathBuf;

use clap::Args;
use leaf_config::{CliSettings, Config, SiteConfig};
use leaf_site::Site;

use crate::error::CliError;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use resolve::ResolveArgs;

/// Configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover leaf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl ConfigArgs {
    /// Load the configuration, applying CLI overrides.
    pub(crate) fn load(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            output_dir,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Load the named site, or every declared site when `name` is `None`.
pub(crate) fn load_sites(config: &Config, name: Option<&str>) -> Result<Vec<Site>, CliError> {
    let site_configs: Vec<(String, SiteConfig)> = match name {
        Some(name) => vec![(name.to_owned(), config.site(name)?)],
        None => config.site_configs(),
    };

    if site_configs.is_empty() {
        return Err(CliError::Validation(
            "no sites declared, add a [sites.<name>] table to leaf.toml".to_owned(),
        ));
    }

    site_configs
        .into_iter()
        .map(|(name, site_config)| {
            tracing::debug!(site = %name, title = %site_config.title, "Loading site");
            Site::load(
                name,
                site_config,
                &config.layouts,
                &config.docs_resolved.source_dir,
            )
            .map_err(CliError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use leaf_site::LayoutVariant;

    use super::*;

    fn write_project(root: &Path) -> PathBuf {
        let docs = root.join("docs");
        fs::create_dir_all(docs.join("posts")).unwrap();
        fs::write(docs.join("index.md"), "---\nlayout: bento\n---\n").unwrap();
        fs::write(docs.join("posts").join("first.md"), "# First").unwrap();

        let config_path = root.join("leaf.toml");
        fs::write(
            &config_path,
            r#"
[layouts]
bento = "CustomHome"

[sites.en]
title = "Blog"
nav = [{ text = "Home", link = "/" }]

[sites.zh]
title = "博客"
lang = "zh-CN"
nav = [{ text = "文章", link = "/posts/missing" }]
"#,
        )
        .unwrap();
        config_path
    }

    fn args(config_path: PathBuf) -> ConfigArgs {
        ConfigArgs {
            config: Some(config_path),
            source_dir: None,
        }
    }

    #[test]
    fn test_load_sites_all() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = args(write_project(temp_dir.path())).load(None).unwrap();

        let sites = load_sites(&config, None).unwrap();

        let names: Vec<_> = sites.iter().map(Site::name).collect();
        assert_eq!(names, vec!["en", "zh"]);
        assert_eq!(
            sites[0].resolve("/").layout,
            LayoutVariant::Named("CustomHome".to_owned())
        );
        assert!(sites[0].check().is_empty());
        assert_eq!(sites[1].check().len(), 1);
    }

    #[test]
    fn test_load_sites_by_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = args(write_project(temp_dir.path())).load(None).unwrap();

        let sites = load_sites(&config, Some("zh")).unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].config().lang, "zh-CN");
    }

    #[test]
    fn test_load_sites_unknown_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = args(write_project(temp_dir.path())).load(None).unwrap();

        assert!(matches!(
            load_sites(&config, Some("fr")),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn test_source_dir_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = write_project(temp_dir.path());
        let empty_docs = temp_dir.path().join("empty");
        fs::create_dir(&empty_docs).unwrap();

        let config = ConfigArgs {
            config: Some(config_path),
            source_dir: Some(empty_docs),
        }
        .load(None)
        .unwrap();
        let sites = load_sites(&config, Some("en")).unwrap();

        assert!(sites[0].content().is_empty());
        assert_eq!(sites[0].check().len(), 1);
    }
}
