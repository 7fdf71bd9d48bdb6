//! Declarative site configuration.
//!
//! A site is declared as a `[sites.<name>]` table in `leaf.toml` and parsed
//! into a [`SiteDecl`]. [`SiteConfig::from_decl`] turns the declaration into
//! the immutable value consumed by the rest of the pipeline: defaults are
//! filled in and the optional diagram plugin is layered on top of the base
//! configuration.
//!
//! Several sites may be declared side by side (one per locale, for example).
//! Each one is self-contained; nothing is merged between them.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ConfigError, require_http_url, require_non_empty};

/// Default site language.
const DEFAULT_LANG: &str = "en-US";

/// Default base URL path.
const DEFAULT_BASE: &str = "/";

/// Link shown in the top navigation bar or inside a sidebar group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Display text.
    pub text: String,
    /// Target path (e.g. `/guide/intro`) or external URL.
    pub link: String,
}

impl NavEntry {
    /// Create a navigation entry.
    pub fn new(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
        }
    }
}

/// Titled group of sidebar links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarGroup {
    /// Group heading.
    pub text: String,
    /// Links in display order.
    #[serde(default)]
    pub items: Vec<NavEntry>,
    /// Whether the group starts collapsed. `None` means not collapsible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl SidebarGroup {
    /// Create a group with the given heading and links.
    pub fn new(text: impl Into<String>, items: Vec<NavEntry>) -> Self {
        Self {
            text: text.into(),
            items,
            collapsed: None,
        }
    }
}

/// Sidebar groups keyed by URL path prefix.
///
/// Keeps declaration order. Inserting an existing prefix replaces its groups
/// in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarMap {
    scopes: Vec<(String, Vec<SidebarGroup>)>,
}

impl SidebarMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register groups under a path prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, groups: Vec<SidebarGroup>) {
        let prefix = prefix.into();
        if let Some(slot) = self.scopes.iter_mut().find(|(p, _)| *p == prefix) {
            slot.1 = groups;
        } else {
            self.scopes.push((prefix, groups));
        }
    }

    /// Groups registered under exactly this prefix.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&[SidebarGroup]> {
        self.scopes
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, groups)| groups.as_slice())
    }

    /// Iterate over `(prefix, groups)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SidebarGroup])> {
        self.scopes
            .iter()
            .map(|(prefix, groups)| (prefix.as_str(), groups.as_slice()))
    }

    /// Number of prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no prefix is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl Serialize for SidebarMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for SidebarMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SidebarMapVisitor;

        impl<'de> Visitor<'de> for SidebarMapVisitor {
            type Value = SidebarMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of path prefixes to sidebar groups")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SidebarMap, A::Error> {
                let mut map = SidebarMap::new();
                while let Some((prefix, groups)) =
                    access.next_entry::<String, Vec<SidebarGroup>>()?
                {
                    map.insert(prefix, groups);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SidebarMapVisitor)
    }
}

/// Sidebar declaration.
///
/// A flat list applies to every page. A map scopes groups to the pages under
/// a path prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sidebar {
    /// Groups shown on every page.
    Flat(Vec<SidebarGroup>),
    /// Groups selected by the most specific matching path prefix.
    Scoped(SidebarMap),
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

/// Social link rendered as an icon in the navigation bar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Icon name (e.g. `github`).
    pub icon: String,
    /// Absolute URL.
    pub link: String,
}

/// Search provider used by the rendered site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum SearchProvider {
    /// Client-side index built by the renderer.
    #[default]
    Local,
    /// Hosted Algolia `DocSearch`.
    Algolia {
        /// Application id.
        app_id: String,
        /// Search-only API key.
        api_key: String,
        /// Index name.
        index_name: String,
    },
}

/// Raw diagram plugin declaration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiagramsDecl {
    /// Whether the plugin wraps the base configuration.
    pub enabled: bool,
    /// Diagram theme name.
    pub theme: Option<String>,
    /// Remaining plugin options, passed through untouched.
    #[serde(flatten)]
    pub options: BTreeMap<String, serde_json::Value>,
}

/// Settings for the diagram rendering plugin.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiagramSettings {
    /// Diagram theme name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Plugin options passed to the renderer.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,
}

/// Raw site declaration as parsed from a `[sites.<name>]` table.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteDecl {
    pub title: String,
    pub description: String,
    pub lang: Option<String>,
    pub base: Option<String>,
    pub nav: Vec<NavEntry>,
    pub sidebar: Sidebar,
    pub social_links: Vec<SocialLink>,
    pub search: SearchProvider,
    pub diagrams: Option<DiagramsDecl>,
}

impl SiteDecl {
    /// Validate the declaration. `name` is used in error messages.
    pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let field = |suffix: &str| format!("sites.{name}.{suffix}");

        require_non_empty(&self.title, &field("title"))?;

        if let Some(base) = &self.base
            && !(base.starts_with('/') && base.ends_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "{} must start and end with '/'",
                field("base")
            )));
        }

        for (i, entry) in self.nav.iter().enumerate() {
            validate_entry(entry, &field(&format!("nav[{i}]")))?;
        }

        match &self.sidebar {
            Sidebar::Flat(groups) => validate_groups(groups, &field("sidebar"))?,
            Sidebar::Scoped(map) => {
                for (prefix, groups) in map.iter() {
                    if !prefix.starts_with('/') {
                        return Err(ConfigError::Validation(format!(
                            "{} key \"{prefix}\" must start with '/'",
                            field("sidebar")
                        )));
                    }
                    validate_groups(groups, &field(&format!("sidebar.\"{prefix}\"")))?;
                }
            }
        }

        for (i, social) in self.social_links.iter().enumerate() {
            let path = field(&format!("social_links[{i}]"));
            require_non_empty(&social.icon, &format!("{path}.icon"))?;
            require_http_url(&social.link, &format!("{path}.link"))?;
        }

        if let SearchProvider::Algolia {
            app_id,
            api_key,
            index_name,
        } = &self.search
        {
            require_non_empty(app_id, &field("search.app_id"))?;
            require_non_empty(api_key, &field("search.api_key"))?;
            require_non_empty(index_name, &field("search.index_name"))?;
        }

        Ok(())
    }
}

fn validate_groups(groups: &[SidebarGroup], path: &str) -> Result<(), ConfigError> {
    for (i, group) in groups.iter().enumerate() {
        require_non_empty(&group.text, &format!("{path}[{i}].text"))?;
        for (j, entry) in group.items.iter().enumerate() {
            validate_entry(entry, &format!("{path}[{i}].items[{j}]"))?;
        }
    }
    Ok(())
}

fn validate_entry(entry: &NavEntry, path: &str) -> Result<(), ConfigError> {
    require_non_empty(&entry.text, &format!("{path}.text"))?;
    require_non_empty(&entry.link, &format!("{path}.link"))?;
    Ok(())
}

/// Resolved, immutable site configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description (HTML meta).
    pub description: String,
    /// Language tag.
    pub lang: String,
    /// Base URL path the site is served from.
    pub base: String,
    /// Top navigation entries in display order.
    pub nav: Vec<NavEntry>,
    /// Sidebar declaration.
    pub sidebar: Sidebar,
    /// Social links.
    pub social_links: Vec<SocialLink>,
    /// Search provider.
    pub search: SearchProvider,
    /// Diagram plugin settings, present only when the plugin is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagrams: Option<DiagramSettings>,
}

impl SiteConfig {
    /// Build a site configuration from its declaration.
    ///
    /// Fills in `lang` and `base` defaults. When the declaration enables the
    /// diagram plugin, the result is the base configuration wrapped by
    /// [`SiteConfig::with_diagrams`].
    #[must_use]
    pub fn from_decl(decl: &SiteDecl) -> Self {
        let base = Self {
            title: decl.title.clone(),
            description: decl.description.clone(),
            lang: decl
                .lang
                .clone()
                .unwrap_or_else(|| DEFAULT_LANG.to_owned()),
            base: decl
                .base
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE.to_owned()),
            nav: decl.nav.clone(),
            sidebar: decl.sidebar.clone(),
            social_links: decl.social_links.clone(),
            search: decl.search.clone(),
            diagrams: None,
        };

        match &decl.diagrams {
            Some(diagrams) if diagrams.enabled => base.with_diagrams(DiagramSettings {
                theme: diagrams.theme.clone(),
                options: diagrams.options.clone(),
            }),
            _ => base,
        }
    }

    /// Augment the configuration with diagram plugin settings.
    #[must_use]
    pub fn with_diagrams(self, settings: DiagramSettings) -> Self {
        Self {
            diagrams: Some(settings),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str) -> SiteDecl {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_parse_flat_sidebar() {
        let decl = parse(
            r#"
title = "Blog"

[[sidebar]]
text = "Guide"
items = [
    { text = "Intro", link = "/guide/intro" },
    { text = "Setup", link = "/guide/setup" },
]
"#,
        );

        assert_eq!(
            decl.sidebar,
            Sidebar::Flat(vec![SidebarGroup::new(
                "Guide",
                vec![
                    NavEntry::new("Intro", "/guide/intro"),
                    NavEntry::new("Setup", "/guide/setup"),
                ],
            )])
        );
    }

    #[test]
    fn test_parse_scoped_sidebar() {
        let decl = parse(
            r#"
title = "Blog"

[sidebar]
"/posts/harmonyos/" = [
    { text = "Articles", items = [{ text = "Navigation", link = "/posts/harmonyos/Articles/Navigation" }] },
]
"/posts/rust/" = [
    { text = "Rust", collapsed = true, items = [] },
]
"#,
        );

        let Sidebar::Scoped(map) = &decl.sidebar else {
            panic!("expected scoped sidebar, got {:?}", decl.sidebar);
        };
        assert_eq!(map.len(), 2);
        let harmony = map.get("/posts/harmonyos/").unwrap();
        assert_eq!(harmony[0].text, "Articles");
        assert_eq!(harmony[0].items[0].text, "Navigation");
        assert_eq!(map.get("/posts/rust/").unwrap()[0].collapsed, Some(true));
    }

    #[test]
    fn test_missing_sidebar_is_empty_flat() {
        let decl = parse("title = \"Blog\"");
        assert_eq!(decl.sidebar, Sidebar::Flat(Vec::new()));
    }

    #[test]
    fn test_parse_search_provider() {
        let decl = parse(
            r#"
title = "Blog"
search = { provider = "algolia", app_id = "APP", api_key = "KEY", index_name = "blog" }
"#,
        );
        assert_eq!(
            decl.search,
            SearchProvider::Algolia {
                app_id: "APP".to_owned(),
                api_key: "KEY".to_owned(),
                index_name: "blog".to_owned(),
            }
        );

        let decl = parse("title = \"Blog\"\nsearch = { provider = \"local\" }");
        assert_eq!(decl.search, SearchProvider::Local);
    }

    #[test]
    fn test_from_decl_fills_defaults() {
        let config = SiteConfig::from_decl(&parse("title = \"Blog\""));
        assert_eq!(config.lang, "en-US");
        assert_eq!(config.base, "/");
        assert!(config.diagrams.is_none());
        assert_eq!(config.search, SearchProvider::Local);
    }

    #[test]
    fn test_from_decl_is_idempotent() {
        let decl = parse(
            r#"
title = "Blog"
lang = "zh-CN"
nav = [{ text = "Home", link = "/" }]

[sidebar]
"/posts/" = [{ text = "Posts", items = [{ text = "First", link = "/posts/first" }] }]

[diagrams]
enabled = true
theme = "forest"
"#,
        );

        assert_eq!(SiteConfig::from_decl(&decl), SiteConfig::from_decl(&decl));
    }

    #[test]
    fn test_diagrams_enabled_wraps_base() {
        let decl = parse(
            r#"
title = "Blog"

[diagrams]
enabled = true
theme = "dark"
securityLevel = "loose"
"#,
        );
        let config = SiteConfig::from_decl(&decl);

        let diagrams = config.diagrams.clone().unwrap();
        assert_eq!(diagrams.theme, Some("dark".to_owned()));
        assert_eq!(
            diagrams.options.get("securityLevel"),
            Some(&serde_json::json!("loose"))
        );

        // Apart from the plugin settings, the result is the base configuration.
        let base = SiteConfig::from_decl(&SiteDecl {
            diagrams: None,
            ..decl
        });
        assert_eq!(
            SiteConfig {
                diagrams: None,
                ..config
            },
            base
        );
    }

    #[test]
    fn test_diagrams_disabled_equals_base() {
        let with_section = parse("title = \"Blog\"\n[diagrams]\nenabled = false\ntheme = \"dark\"");
        let without_section = parse("title = \"Blog\"");
        assert_eq!(
            SiteConfig::from_decl(&with_section),
            SiteConfig::from_decl(&without_section)
        );
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let err = SiteDecl::default().validate("en").unwrap_err();
        assert!(err.to_string().contains("sites.en.title"));
    }

    #[test]
    fn test_validate_rejects_bad_base() {
        let decl = parse("title = \"Blog\"\nbase = \"docs\"");
        let err = decl.validate("en").unwrap_err();
        assert!(err.to_string().contains("sites.en.base"));
    }

    #[test]
    fn test_validate_rejects_relative_sidebar_key() {
        let decl = parse("title = \"Blog\"\n[sidebar]\n\"posts/\" = []");
        let err = decl.validate("zh").unwrap_err();
        assert!(err.to_string().contains("posts/"));
    }

    #[test]
    fn test_validate_rejects_empty_link() {
        let decl = parse("title = \"Blog\"\nnav = [{ text = \"Home\", link = \"\" }]");
        let err = decl.validate("en").unwrap_err();
        assert!(err.to_string().contains("sites.en.nav[0].link"));
    }

    #[test]
    fn test_validate_rejects_non_http_social_link() {
        let decl = parse(
            "title = \"Blog\"\nsocial_links = [{ icon = \"github\", link = \"github.com/x\" }]",
        );
        let err = decl.validate("en").unwrap_err();
        assert!(err.to_string().contains("social_links[0].link"));
    }

    #[test]
    fn test_validate_rejects_empty_algolia_key() {
        let decl = parse(
            r#"
title = "Blog"
search = { provider = "algolia", app_id = "APP", api_key = "", index_name = "blog" }
"#,
        );
        let err = decl.validate("en").unwrap_err();
        assert!(err.to_string().contains("search.api_key"));
    }

    #[test]
    fn test_sidebar_map_insert_replaces() {
        let mut map = SidebarMap::new();
        map.insert("/a/", vec![SidebarGroup::new("Old", vec![])]);
        map.insert("/b/", vec![]);
        map.insert("/a/", vec![SidebarGroup::new("New", vec![])]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("/a/").unwrap()[0].text, "New");
        let prefixes: Vec<_> = map.iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["/a/", "/b/"]);
    }

    #[test]
    fn test_site_config_serializes_scoped_sidebar_as_map() {
        let mut map = SidebarMap::new();
        map.insert(
            "/posts/",
            vec![SidebarGroup::new("Posts", vec![NavEntry::new("First", "/posts/first")])],
        );
        let decl = SiteDecl {
            title: "Blog".to_owned(),
            sidebar: Sidebar::Scoped(map),
            ..SiteDecl::default()
        };

        let json = serde_json::to_value(SiteConfig::from_decl(&decl)).unwrap();

        assert_eq!(json["sidebar"]["/posts/"][0]["text"], "Posts");
        assert_eq!(json["search"]["provider"], "local");
        assert!(json.get("diagrams").is_none());
    }
}
