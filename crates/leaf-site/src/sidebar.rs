//! Sidebar resolution.
//!
//! A flat sidebar applies to every page. A scoped sidebar is keyed by URL
//! path prefix and the most specific prefix matching the page wins.
//!
//! # Example
//!
//! ```
//! use leaf_config::{NavEntry, Sidebar, SidebarGroup, SidebarMap};
//! use leaf_site::resolve_sidebar;
//!
//! let mut map = SidebarMap::new();
//! map.insert("/posts/", vec![SidebarGroup::new("Posts", vec![])]);
//! map.insert(
//!     "/posts/harmonyos/",
//!     vec![SidebarGroup::new(
//!         "Articles",
//!         vec![NavEntry::new("Navigation", "/posts/harmonyos/Articles/Navigation")],
//!     )],
//! );
//! let sidebar = Sidebar::Scoped(map);
//!
//! let groups = resolve_sidebar(&sidebar, "/posts/harmonyos/Articles/Navigation");
//! assert_eq!(groups[0].text, "Articles");
//! ```

use leaf_config::{NavEntry, Sidebar, SidebarGroup};
use serde::Serialize;

/// Normalize a page path or link for comparison.
///
/// - drops `#fragment` and `?query`
/// - ensures a leading `/`
/// - drops a `.md` or `.html` extension
/// - maps a trailing `/index` to `/`
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['#', '?']).unwrap_or(path.len());
    let path = &path[..end];

    let path = path
        .strip_suffix(".md")
        .or_else(|| path.strip_suffix(".html"))
        .unwrap_or(path);

    // `index` documents are addressed by their directory.
    let path = if path == "index" {
        ""
    } else if let Some(dir) = path.strip_suffix("/index") {
        &path[..=dir.len()]
    } else {
        path
    };

    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// Whether a sidebar key matches a normalized page path.
///
/// Keys ending in `/` match by plain prefix. Other keys match whole path
/// segments only, so `/posts` matches `/posts/a` but not `/postscript`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix.ends_with('/') {
        path.starts_with(prefix) || path == prefix.trim_end_matches('/')
    } else {
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Resolve the sidebar groups shown on a page.
///
/// Returns every group of a flat sidebar. For a scoped sidebar, returns the
/// groups of the longest matching prefix (the first declared one on a tie),
/// or an empty slice when nothing matches.
#[must_use]
pub fn resolve_sidebar<'a>(sidebar: &'a Sidebar, path: &str) -> &'a [SidebarGroup] {
    match sidebar {
        Sidebar::Flat(groups) => groups,
        Sidebar::Scoped(map) => {
            let path = normalize_path(path);
            let mut best: Option<(usize, &[SidebarGroup])> = None;

            for (prefix, groups) in map.iter() {
                let key = if prefix.starts_with('/') {
                    prefix.to_owned()
                } else {
                    format!("/{prefix}")
                };
                if !prefix_matches(&key, &path) {
                    continue;
                }
                if best.is_none_or(|(len, _)| key.len() > len) {
                    best = Some((key.len(), groups));
                }
            }

            best.map(|(_, groups)| groups).unwrap_or_default()
        }
    }
}

/// Previous and next pages in sidebar order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageNeighbors {
    /// Entry before the current page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NavEntry>,
    /// Entry after the current page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NavEntry>,
}

/// Find the entries surrounding a page in the flattened sidebar.
///
/// Both sides are `None` when the page is not in the sidebar.
#[must_use]
pub fn neighbors(groups: &[SidebarGroup], path: &str) -> PageNeighbors {
    let path = normalize_path(path);
    let entries: Vec<&NavEntry> = groups.iter().flat_map(|g| &g.items).collect();

    let Some(pos) = entries
        .iter()
        .position(|entry| normalize_path(&entry.link) == path)
    else {
        return PageNeighbors::default();
    };

    PageNeighbors {
        prev: pos
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .map(|entry| (*entry).clone()),
        next: entries.get(pos + 1).map(|entry| (*entry).clone()),
    }
}
