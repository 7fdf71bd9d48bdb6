//! Configuration management for Leaf.
//!
//! Parses `leaf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Sites
//!
//! Each `[sites.<name>]` table declares one independent site (for example
//! one per locale). Declarations are turned into immutable [`SiteConfig`]
//! values with [`Config::site`].
//!
//! ## Layouts
//!
//! The `[layouts]` table maps a front matter `layout` value to the name of
//! the custom component that renders it.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `sites.*.base`
//! - `sites.*.search.app_id`
//! - `sites.*.search.api_key`

mod site;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use site::{
    DiagramSettings, DiagramsDecl, NavEntry, SearchProvider, Sidebar, SidebarGroup, SidebarMap,
    SiteConfig, SiteDecl, SocialLink,
};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override manifest output directory.
    pub output_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "leaf.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Custom layout components keyed by variant name.
    pub layouts: BTreeMap<String, String>,
    /// Site declarations keyed by site name.
    pub sites: BTreeMap<String, SiteDecl>,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for markdown files.
    pub source_dir: PathBuf,
    /// Directory that `leaf build` writes site manifests to.
    pub output_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`sites.en.search.api_key`").
        field: String,
        /// Error message (e.g., "${`ALGOLIA_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
pub(crate) fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `leaf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Relative paths are resolved against `base_dir`. The result is
    /// validated the same way as a config file.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
    }

    /// Build the configuration of a declared site.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no site with this name is declared.
    pub fn site(&self, name: &str) -> Result<SiteConfig, ConfigError> {
        self.sites
            .get(name)
            .map(SiteConfig::from_decl)
            .ok_or_else(|| ConfigError::Validation(format!("site \"{name}\" is not declared")))
    }

    /// Build every declared site, ordered by name.
    #[must_use]
    pub fn site_configs(&self) -> Vec<(String, SiteConfig)> {
        self.sites
            .iter()
            .map(|(name, decl)| (name.clone(), SiteConfig::from_decl(decl)))
            .collect()
    }

    /// Pick a site by name, or the only declared site when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the name is unknown, or if no name
    /// was given and the number of declared sites is not exactly one.
    pub fn select_site(&self, name: Option<&str>) -> Result<(String, SiteConfig), ConfigError> {
        if let Some(name) = name {
            return Ok((name.to_owned(), self.site(name)?));
        }

        let mut names = self.sites.keys();
        match (names.next(), names.next()) {
            (Some(only), None) => Ok((only.clone(), self.site(only)?)),
            (None, _) => Err(ConfigError::Validation("no sites declared".to_owned())),
            (Some(_), Some(_)) => Err(ConfigError::Validation(format!(
                "multiple sites declared ({}), choose one with --site",
                self.sites.keys().cloned().collect::<Vec<_>>().join(", ")
            ))),
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            layouts: BTreeMap::new(),
            sites: BTreeMap::new(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join(".leaf").join("build"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());

        if config.sites.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{} declares no [sites.<name>] table",
                path.display()
            )));
        }

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_layouts()?;
        for (name, decl) in &self.sites {
            require_non_empty(name, "sites.<name>")?;
            decl.validate(name)?;
        }
        Ok(())
    }

    /// Validate layout registrations.
    fn validate_layouts(&self) -> Result<(), ConfigError> {
        for (variant, component) in &self.layouts {
            require_non_empty(variant, "layouts.<variant>")?;
            require_non_empty(component, &format!("layouts.{variant}"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        for (name, decl) in &mut self.sites {
            if let Some(base) = &mut decl.base {
                expand_field(base, &format!("sites.{name}.base"))?;
            }

            if let SearchProvider::Algolia {
                app_id, api_key, ..
            } = &mut decl.search
            {
                expand_field(app_id, &format!("sites.{name}.search.app_id"))?;
                expand_field(api_key, &format!("sites.{name}.search.api_key"))?;
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), ".leaf/build"),
        };
    }
}

/// Replace `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Values without `${` are left alone, so a literal `$` in a path survives.
fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |var| std::env::var(var).map(Some))
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })?;
    *value = expanded.into_owned();
    Ok(())
}
