//! Sidebar resolution, layout selection and content checks for Leaf.
//!
//! This crate provides:
//! - [`resolve_sidebar`]: pick the sidebar groups shown on a page
//! - [`LayoutRegistry`]: map front matter `layout` values to custom components
//! - [`ContentIndex`]: the Markdown documents of the docs directory
//! - [`Site`]: per-page resolution and manifest output for the renderer
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use leaf_config::Config;
//! use leaf_site::Site;
//!
//! let config = Config::load(None, None)?;
//! let (name, site_config) = config.select_site(None)?;
//! let site = Site::load(name, site_config, &config.layouts, Path::new("docs"))?;
//!
//! let page = site.resolve("/posts/harmonyos/Articles/Navigation");
//! println!("{:?} with {} sidebar groups", page.layout, page.sidebar.len());
//! # Ok(())
//! # }
//! ```

mod content;
mod frontmatter;
mod integrity;
mod layout;
mod sidebar;
mod site;

use std::path::{Path, PathBuf};

pub use content::{ContentIndex, ContentPage};
pub use frontmatter::{FrontMatterError, PageFrontMatter, split_front_matter};
pub use integrity::{IntegrityIssue, check_layouts, check_links, is_external};
pub use layout::{LayoutRegistry, LayoutVariant};
pub use sidebar::{PageNeighbors, neighbors, normalize_path, resolve_sidebar};
pub use site::{PageView, Site, SiteManifest};

/// Error type for site operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Filesystem error.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Manifest serialization error.
    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),
}

impl SiteError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
