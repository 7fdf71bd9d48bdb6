//! Content tree discovery.
//!
//! Walks the docs source directory and indexes every Markdown document by the
//! URL path it is served at, together with its front matter. The index backs
//! link checking and per-page layout selection.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::SiteError;
use crate::frontmatter::PageFrontMatter;
use crate::sidebar::normalize_path;

/// A Markdown document of the content tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentPage {
    /// URL path (e.g. `/`, `/guide/`, `/guide/setup`).
    pub url_path: String,
    /// Source file path relative to the docs directory.
    pub source_path: PathBuf,
    /// Parsed front matter.
    pub front_matter: PageFrontMatter,
}

/// Index of content pages keyed by URL path.
#[derive(Clone, Debug, Default)]
pub struct ContentIndex {
    pages: BTreeMap<String, ContentPage>,
}

impl ContentIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a docs directory.
    ///
    /// Hidden files and directories (leading `.`) are skipped, which keeps
    /// tool directories like `.vitepress` out of the index. A missing
    /// directory yields an empty index. Pages with malformed front matter are
    /// indexed with empty front matter and a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or Markdown file cannot be read.
    pub fn scan(source_dir: &Path) -> Result<Self, SiteError> {
        let mut index = Self::new();
        if !source_dir.exists() {
            tracing::warn!(dir = %source_dir.display(), "Docs directory does not exist");
            return Ok(index);
        }

        index.scan_directory(source_dir, Path::new(""))?;
        tracing::debug!(pages = index.len(), dir = %source_dir.display(), "Scanned content tree");
        Ok(index)
    }

    /// Scan one directory level and recurse into subdirectories.
    fn scan_directory(&mut self, dir_path: &Path, rel_dir: &Path) -> Result<(), SiteError> {
        let entries = fs::read_dir(dir_path).map_err(|e| SiteError::io(dir_path, e))?;

        // Sort for deterministic traversal
        let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let rel_path = rel_dir.join(&name);
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            if is_dir {
                self.scan_directory(&path, &rel_path)?;
            } else if path.extension().is_some_and(|e| e == "md") {
                let source = fs::read_to_string(&path).map_err(|e| SiteError::io(&path, e))?;
                let front_matter = PageFrontMatter::from_markdown(&source).unwrap_or_else(|e| {
                    tracing::warn!(file = %rel_path.display(), error = %e, "Ignoring malformed front matter");
                    PageFrontMatter::default()
                });
                self.insert(ContentPage {
                    url_path: file_path_to_url(&rel_path),
                    source_path: rel_path,
                    front_matter,
                });
            }
        }

        Ok(())
    }

    /// Add a page, replacing any page at the same URL path.
    pub fn insert(&mut self, page: ContentPage) {
        self.pages.insert(page.url_path.clone(), page);
    }

    /// Find the page served at a path or link.
    ///
    /// A link without trailing slash also finds a directory index
    /// (`/guide` finds `/guide/`).
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ContentPage> {
        let path = normalize_path(path);
        self.pages.get(&path).or_else(|| {
            if path.ends_with('/') {
                None
            } else {
                self.pages.get(&format!("{path}/"))
            }
        })
    }

    /// Whether a page is served at a path or link.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Iterate over pages ordered by URL path.
    pub fn pages(&self) -> impl Iterator<Item = &ContentPage> {
        self.pages.values()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the index has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Convert a Markdown file path relative to the docs root into a URL path.
///
/// - `index.md` -> `/`
/// - `guide.md` -> `/guide`
/// - `guide/index.md` -> `/guide/`
/// - `guide/setup.md` -> `/guide/setup`
pub(crate) fn file_path_to_url(rel_path: &Path) -> String {
    let joined = rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    normalize_path(&joined)
}
