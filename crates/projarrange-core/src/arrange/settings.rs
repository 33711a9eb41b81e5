use std::path::Path;

use serde::{Deserialize, Serialize};

use super::options::ArrangeOptions;
use crate::error::Result;

/// List entry that expands to the built-in defaults for that list.
pub const DEFAULT_MARKER: &str = "[Default]";

pub const DEFAULT_STICKY_ELEMENT_NAMES: &[&str] = &[
    // Primary
    "Task",
    "PropertyGroup",
    "ItemGroup",
    "Target",
    // Secondary: PropertyGroup
    "Configuration",
    "Platform",
    // Secondary: ItemGroup
    "ProjectReference",
    "Reference",
    "Compile",
    "Folder",
    "Content",
    "None",
    // Secondary: Choose
    "When",
    "Otherwise",
];

pub const DEFAULT_KEEP_ORDER_ELEMENT_NAMES: &[&str] = &["Target"];

pub const DEFAULT_SORT_ATTRIBUTES: &[&str] = &["Include"];

/// Settings for arranging a project document.
///
/// Every list may contain [`DEFAULT_MARKER`], which [`resolve`](Self::resolve)
/// replaces with the built-in defaults for that list. A list left at its
/// default therefore means "the built-in defaults".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArrangeSettings {
    /// Element names sorted before all others, in this order.
    pub sticky_element_names: Vec<String>,

    /// Elements whose direct children keep their source order.
    pub keep_order_element_names: Vec<String>,

    /// Attributes compared, in order, between elements of the same name.
    pub sort_attributes: Vec<String>,

    /// Options used outside `<!-- Options: ... -->` sections.
    pub options: ArrangeOptions,
}

impl Default for ArrangeSettings {
    fn default() -> Self {
        Self {
            sticky_element_names: vec![DEFAULT_MARKER.to_string()],
            keep_order_element_names: vec![DEFAULT_MARKER.to_string()],
            sort_attributes: vec![DEFAULT_MARKER.to_string()],
            options: ArrangeOptions::empty(),
        }
    }
}

impl ArrangeSettings {
    /// Creates a new instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sticky_element_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sticky_element_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keep_order_element_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_order_element_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_attributes = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: ArrangeOptions) -> Self {
        self.options = options;
        self
    }

    /// Reads settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Expands default markers into the immutable form used while arranging.
    pub fn resolve(&self) -> ResolvedSettings {
        ResolvedSettings {
            sticky_element_names: expand_default_marker(
                &self.sticky_element_names,
                DEFAULT_STICKY_ELEMENT_NAMES,
            ),
            keep_order_element_names: expand_default_marker(
                &self.keep_order_element_names,
                DEFAULT_KEEP_ORDER_ELEMENT_NAMES,
            ),
            sort_attributes: expand_default_marker(&self.sort_attributes, DEFAULT_SORT_ATTRIBUTES),
            options: self.options,
        }
    }
}

/// Settings with every default marker expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub sticky_element_names: Vec<String>,
    pub keep_order_element_names: Vec<String>,
    pub sort_attributes: Vec<String>,
    pub options: ArrangeOptions,
}

impl ResolvedSettings {
    pub fn is_keep_order(&self, local_name: &str) -> bool {
        self.keep_order_element_names.iter().any(|name| name == local_name)
    }
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        ArrangeSettings::default().resolve()
    }
}

/// Replaces each [`DEFAULT_MARKER`] entry with `defaults`, in place.
fn expand_default_marker(list: &[String], defaults: &[&str]) -> Vec<String> {
    let mut expanded = Vec::with_capacity(list.len() + defaults.len());
    for entry in list {
        if entry == DEFAULT_MARKER {
            expanded.extend(defaults.iter().map(|name| name.to_string()));
        } else {
            expanded.push(entry.clone());
        }
    }
    expanded
}
