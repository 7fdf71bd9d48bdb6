//! Page front matter.
//!
//! Front matter is a YAML block at the very top of a Markdown file, fenced by
//! `---` lines:
//!
//! ```text
//! ---
//! layout: bento
//! title: Home
//! ---
//! # Welcome
//! ```
//!
//! Only `layout`, `title` and `description` are interpreted. Every other key
//! is kept in [`PageFrontMatter::extra`] for the renderer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Front matter fields of a single page.
///
/// `layout`, `title` and `description` are only set when the YAML value is a
/// string. Any other value (`title: 2024`, `layout: false`) stays in
/// [`PageFrontMatter::extra`] under its own key.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PageFrontMatter {
    /// Layout variant requested by the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,

    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Remaining keys, untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PageFrontMatter {
    /// Front matter that only sets `layout`.
    pub fn with_layout(layout: impl Into<String>) -> Self {
        Self {
            layout: Some(layout.into()),
            ..Self::default()
        }
    }

    /// Parse front matter from YAML content.
    ///
    /// Empty content returns a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, FrontMatterError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut extra: BTreeMap<String, Value> = serde_yaml::from_str(trimmed)
            .map_err(|e| FrontMatterError::Parse(format!("Invalid YAML: {e}")))?;

        Ok(Self {
            layout: take_string(&mut extra, "layout"),
            title: take_string(&mut extra, "title"),
            description: take_string(&mut extra, "description"),
            extra,
        })
    }

    /// Parse the front matter block of a Markdown document.
    ///
    /// Documents without a front matter block return a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the block exists but is not valid YAML.
    pub fn from_markdown(source: &str) -> Result<Self, FrontMatterError> {
        match split_front_matter(source).0 {
            Some(yaml) => Self::from_yaml(yaml),
            None => Ok(Self::default()),
        }
    }

    /// Look up a raw front matter value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        let typed = match key {
            "layout" => self.layout.as_ref(),
            "title" => self.title.as_ref(),
            "description" => self.description.as_ref(),
            _ => None,
        };
        typed
            .map(|s| Value::String(s.clone()))
            .or_else(|| self.extra.get(key).cloned())
    }
}

/// Remove `key` from `fields` if it holds a string.
fn take_string(fields: &mut BTreeMap<String, Value>, key: &str) -> Option<String> {
    if !matches!(fields.get(key), Some(Value::String(_))) {
        return None;
    }
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Error type for front matter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    /// YAML parsing error.
    #[error("{0}")]
    Parse(String),
}

/// Split a Markdown document into its front matter block and body.
///
/// Returns `(None, source)` when the document does not open with a `---`
/// line or the block is never closed.
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = source
        .strip_prefix("---")
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return (None, source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, source)
}
