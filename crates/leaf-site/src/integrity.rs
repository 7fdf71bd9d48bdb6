//! Content integrity checks.
//!
//! Every internal navigation and sidebar link must point at a document of the
//! content tree. Pages asking for a layout that has no registered component
//! are reported too; they still render with the default layout.

use std::fmt;

use leaf_config::{NavEntry, Sidebar, SiteConfig};
use serde::Serialize;

use crate::content::ContentIndex;
use crate::layout::LayoutRegistry;

/// Layout names the default layout wrapper handles on its own.
const BUILTIN_LAYOUTS: &[&str] = &["doc", "home", "page"];

/// Problem found by an integrity check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// Internal link without a matching document.
    BrokenLink {
        /// Where the link is declared (e.g. `nav`, `sidebar "/posts/" > Articles`).
        location: String,
        /// Link text.
        text: String,
        /// Link target.
        link: String,
    },
    /// Page front matter names a layout without a registered component.
    UnknownLayout {
        /// URL path of the page.
        page: String,
        /// Requested layout name.
        layout: String,
    },
}

impl IntegrityIssue {
    /// Whether the issue should fail a check run.
    ///
    /// Broken links are fatal. Unknown layouts fall back to the default
    /// layout and are only reported.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BrokenLink { .. })
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BrokenLink {
                location,
                text,
                link,
            } => write!(f, "{location}: \"{text}\" links to missing page {link}"),
            Self::UnknownLayout { page, layout } => write!(
                f,
                "{page}: layout \"{layout}\" has no registered component, using default"
            ),
        }
    }
}

/// Whether a link points outside the site.
#[must_use]
pub fn is_external(link: &str) -> bool {
    link.starts_with("http://")
        || link.starts_with("https://")
        || link.starts_with("//")
        || link.starts_with("mailto:")
        || link.starts_with("tel:")
}

/// Check that every internal nav and sidebar link resolves to a document.
///
/// External links are skipped and fragments ignored. Issues are returned in
/// declaration order.
#[must_use]
pub fn check_links(config: &SiteConfig, content: &ContentIndex) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    check_entries(&config.nav, "nav", content, &mut issues);

    match &config.sidebar {
        Sidebar::Flat(groups) => {
            for group in groups {
                let location = format!("sidebar > {}", group.text);
                check_entries(&group.items, &location, content, &mut issues);
            }
        }
        Sidebar::Scoped(map) => {
            for (prefix, groups) in map.iter() {
                for group in groups {
                    let location = format!("sidebar \"{prefix}\" > {}", group.text);
                    check_entries(&group.items, &location, content, &mut issues);
                }
            }
        }
    }

    issues
}

fn check_entries(
    entries: &[NavEntry],
    location: &str,
    content: &ContentIndex,
    issues: &mut Vec<IntegrityIssue>,
) {
    for entry in entries {
        // Pure fragment links point into the current page
        if is_external(&entry.link) || entry.link.starts_with('#') {
            continue;
        }
        if !content.contains(&entry.link) {
            issues.push(IntegrityIssue::BrokenLink {
                location: location.to_owned(),
                text: entry.text.clone(),
                link: entry.link.clone(),
            });
        }
    }
}

/// Report pages whose `layout` has no registered component.
///
/// Built-in layout names of the default wrapper (`doc`, `home`, `page`) are
/// not reported.
#[must_use]
pub fn check_layouts(content: &ContentIndex, registry: &LayoutRegistry) -> Vec<IntegrityIssue> {
    content
        .pages()
        .filter_map(|page| {
            let layout = page.front_matter.layout.as_deref()?;
            if registry.is_registered(layout) || BUILTIN_LAYOUTS.contains(&layout) {
                return None;
            }
            Some(IntegrityIssue::UnknownLayout {
                page: page.url_path.clone(),
                layout: layout.to_owned(),
            })
        })
        .collect()
}
