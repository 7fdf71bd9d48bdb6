//! Per-site build orchestration.
//!
//! [`Site`] owns everything needed to resolve a page: the immutable site
//! configuration, the layout registry and the content index. It resolves
//! pages one at a time ([`Site::resolve`]) or all at once into a
//! [`SiteManifest`] that the external renderer consumes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use leaf_config::{NavEntry, SidebarGroup, SiteConfig};
use serde::Serialize;

use crate::SiteError;
use crate::content::ContentIndex;
use crate::frontmatter::PageFrontMatter;
use crate::integrity::{IntegrityIssue, check_layouts, check_links};
use crate::layout::{LayoutRegistry, LayoutVariant};
use crate::sidebar::{PageNeighbors, neighbors, normalize_path, resolve_sidebar};

/// Everything the renderer needs to know about one page.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageView {
    /// URL path of the page.
    pub path: String,
    /// Whether the page exists in the content tree.
    pub exists: bool,
    /// Page title from front matter, falling back to its sidebar or nav text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Selected layout.
    pub layout: LayoutVariant,
    /// Sidebar groups shown on the page.
    pub sidebar: Vec<SidebarGroup>,
    /// Previous and next pages in sidebar order.
    pub neighbors: PageNeighbors,
    /// Page front matter.
    pub front_matter: PageFrontMatter,
}

/// Serializable description of a whole site.
#[derive(Debug, Serialize)]
pub struct SiteManifest<'a> {
    /// Site name (the `[sites.<name>]` key).
    pub name: &'a str,
    /// Custom components content may reference.
    pub components: Vec<&'a str>,
    /// Site configuration.
    pub config: &'a SiteConfig,
    /// Resolved pages ordered by URL path.
    pub pages: Vec<PageView>,
}

/// A single site ready to be resolved.
pub struct Site {
    name: String,
    config: SiteConfig,
    registry: LayoutRegistry,
    content: ContentIndex,
}

impl Site {
    /// Create a site from its parts.
    pub fn new(
        name: impl Into<String>,
        config: SiteConfig,
        registry: LayoutRegistry,
        content: ContentIndex,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            registry,
            content,
        }
    }

    /// Create a site by registering `layouts` and scanning `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content tree cannot be read.
    pub fn load(
        name: impl Into<String>,
        config: SiteConfig,
        layouts: &BTreeMap<String, String>,
        source_dir: &Path,
    ) -> Result<Self, SiteError> {
        let registry = LayoutRegistry::from_layouts(layouts);
        let content = ContentIndex::scan(source_dir)?;
        Ok(Self::new(name, config, registry, content))
    }

    /// Site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Layout registry.
    #[must_use]
    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Content index.
    #[must_use]
    pub fn content(&self) -> &ContentIndex {
        &self.content
    }

    /// Resolve the layout, sidebar and neighbours of a page.
    ///
    /// Paths without a document resolve like a page with empty front matter.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PageView {
        let page = self.content.get(path);
        let path = page.map_or_else(|| normalize_path(path), |p| p.url_path.clone());
        let front_matter = page.map(|p| p.front_matter.clone()).unwrap_or_default();

        let groups = resolve_sidebar(&self.config.sidebar, &path);
        let title = front_matter
            .title
            .clone()
            .or_else(|| self.entry_text(groups, &path));

        PageView {
            layout: self.registry.select_layout(&front_matter),
            sidebar: groups.to_vec(),
            neighbors: neighbors(groups, &path),
            exists: page.is_some(),
            title,
            path,
            front_matter,
        }
    }

    /// Text of the first sidebar or nav entry linking to `path`.
    fn entry_text(&self, groups: &[SidebarGroup], path: &str) -> Option<String> {
        groups
            .iter()
            .flat_map(|g| &g.items)
            .chain(&self.config.nav)
            .find(|entry: &&NavEntry| normalize_path(&entry.link) == path)
            .map(|entry| entry.text.clone())
    }

    /// Run the link and layout integrity checks.
    #[must_use]
    pub fn check(&self) -> Vec<IntegrityIssue> {
        let mut issues = check_links(&self.config, &self.content);
        issues.extend(check_layouts(&self.content, &self.registry));
        issues
    }

    /// Resolve every page of the content tree.
    #[must_use]
    pub fn manifest(&self) -> SiteManifest<'_> {
        SiteManifest {
            name: &self.name,
            components: self.registry.components(),
            config: &self.config,
            pages: self
                .content
                .pages()
                .map(|page| self.resolve(&page.url_path))
                .collect(),
        }
    }

    /// Write the manifest to `<dir>/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn write_manifest(&self, dir: &Path) -> Result<PathBuf, SiteError> {
        fs::create_dir_all(dir).map_err(|e| SiteError::io(dir, e))?;

        let manifest = self.manifest();
        let json = serde_json::to_string_pretty(&manifest)?;
        let path = dir.join(format!("{}.json", self.name));
        fs::write(&path, json).map_err(|e| SiteError::io(&path, e))?;

        tracing::info!(
            site = %self.name,
            pages = manifest.pages.len(),
            path = %path.display(),
            "Wrote site manifest"
        );
        Ok(path)
    }
}
