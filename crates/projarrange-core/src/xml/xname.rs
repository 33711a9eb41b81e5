use std::fmt;

use super::namespaces::XMLNS;

/// Qualified XML name: optional namespace URI plus local name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct XName {
    pub namespace: Option<String>,
    pub local_name: String,
}

impl XName {
    pub fn new(namespace: &str, local_name: &str) -> Self {
        Self {
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace.to_string())
            },
            local_name: local_name.to_string(),
        }
    }

    pub fn local(local_name: &str) -> Self {
        Self {
            namespace: None,
            local_name: local_name.to_string(),
        }
    }

    /// `namespace:local` form used for grouping keys. An absent namespace
    /// contributes an empty prefix, so `Foo` becomes `:Foo`.
    pub fn expanded(&self) -> String {
        format!(
            "{}:{}",
            self.namespace.as_deref().unwrap_or(""),
            self.local_name
        )
    }

    /// True for `xmlns` and `xmlns:prefix` declarations carried as attributes.
    pub fn is_namespace_declaration(&self) -> bool {
        match self.namespace.as_deref() {
            None => self.local_name == "xmlns",
            Some(ns) => ns == XMLNS::NS,
        }
    }
}

impl fmt::Display for XName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XAttribute {
    pub name: XName,
    pub value: String,
}

impl XAttribute {
    pub fn new(name: XName, value: &str) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }

    /// Value of the first attribute in `attributes` whose local name matches.
    pub fn find_value<'a>(attributes: &'a [XAttribute], local_name: &str) -> Option<&'a str> {
        attributes
            .iter()
            .find(|attr| attr.name.local_name == local_name)
            .map(|attr| attr.value.as_str())
    }

    /// Serialized attribute set: one `namespace:local:value` line per
    /// attribute, in document order.
    pub fn serialize_set(attributes: &[XAttribute]) -> String {
        attributes
            .iter()
            .map(|attr| format!("{}:{}", attr.name.expanded(), attr.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
