//! Layout selection.
//!
//! Pages opt into a custom landing component by setting `layout` in their
//! front matter. [`LayoutRegistry`] maps variant names to component names and
//! [`LayoutRegistry::select_layout`] picks the layout for one page. Any page
//! whose `layout` is missing or not registered gets [`LayoutVariant::Default`].

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::frontmatter::PageFrontMatter;

/// Layout chosen for a page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "component", rename_all = "lowercase")]
pub enum LayoutVariant {
    /// The renderer's default layout wrapper.
    Default,
    /// A registered custom component, by component name.
    Named(String),
}

impl LayoutVariant {
    /// Component name for named layouts.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Default => None,
            Self::Named(component) => Some(component),
        }
    }
}

/// Registry mapping layout variant names to component names.
///
/// Populated once while the build is set up, then only read.
#[derive(Clone, Debug, Default)]
pub struct LayoutRegistry {
    components: HashMap<String, String>,
}

impl LayoutRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from the `[layouts]` table of the config.
    #[must_use]
    pub fn from_layouts(layouts: &BTreeMap<String, String>) -> Self {
        let mut registry = Self::new();
        for (variant, component) in layouts {
            registry.register(variant.clone(), component.clone());
        }
        registry
    }

    /// Register a component under a variant name.
    ///
    /// Returns the previously registered component, if any.
    pub fn register(
        &mut self,
        variant: impl Into<String>,
        component: impl Into<String>,
    ) -> Option<String> {
        let variant = variant.into();
        let component = component.into();
        let previous = self.components.insert(variant.clone(), component.clone());
        if let Some(previous) = &previous {
            tracing::warn!(
                variant = %variant,
                previous = %previous,
                component = %component,
                "Layout variant registered twice, keeping the latest component"
            );
        }
        previous
    }

    /// Component registered for a variant.
    #[must_use]
    pub fn component(&self, variant: &str) -> Option<&str> {
        self.components.get(variant).map(String::as_str)
    }

    /// Whether a variant is registered.
    #[must_use]
    pub fn is_registered(&self, variant: &str) -> bool {
        self.components.contains_key(variant)
    }

    /// Registered component names, sorted and without duplicates.
    #[must_use]
    pub fn components(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.components.values().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Number of registered variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no variant is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Select the layout for a page.
    ///
    /// Returns the registered component when `layout` names a registered
    /// variant, [`LayoutVariant::Default`] otherwise.
    #[must_use]
    pub fn select_layout(&self, front_matter: &PageFrontMatter) -> LayoutVariant {
        let Some(variant) = front_matter.layout.as_deref() else {
            return LayoutVariant::Default;
        };

        match self.component(variant) {
            Some(component) => LayoutVariant::Named(component.to_owned()),
            None => {
                tracing::debug!(layout = %variant, "No component registered for layout, using default");
                LayoutVariant::Default
            }
        }
    }
}
