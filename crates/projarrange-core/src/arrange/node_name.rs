//! Orders nodes by nearest element name, with some element names stuck to
//! the top in a configured order.

use std::cmp::Ordering;

use indextree::NodeId;

use super::options::ArrangeOptions;
use crate::error::{ArrangeError, Result};
use crate::xml::{XmlDocument, XmlNodeData, MSB};

#[derive(Debug, Clone, Copy)]
pub struct NodeNameComparer<'a> {
    sticky_element_names: &'a [String],
    options: ArrangeOptions,
}

impl<'a> NodeNameComparer<'a> {
    pub fn new(sticky_element_names: &'a [String], options: ArrangeOptions) -> Self {
        Self {
            sticky_element_names,
            options,
        }
    }

    pub fn sticky_index(&self, name: Option<&str>) -> Option<usize> {
        let name = name?;
        self.sticky_element_names.iter().position(|sticky| sticky == name)
    }

    /// Sticky names first, in list order; everything else after them,
    /// ordinally by name. An absent name sorts before any present one.
    pub fn compare_names(&self, x: Option<&str>, y: Option<&str>) -> Ordering {
        match (self.sticky_index(x), self.sticky_index(y)) {
            (None, None) => x.cmp(&y),
            (Some(x_index), Some(y_index)) => x_index.cmp(&y_index),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
        }
    }

    /// Name a node sorts under.
    ///
    /// Elements use their local name. Comments borrow the name of the
    /// nearest element in `following`. With `KeepImportWithNext`, an
    /// `Import` element borrows it too. Anything else has no name.
    pub fn effective_name<'d>(
        &self,
        doc: &'d XmlDocument,
        node: NodeId,
        following: impl IntoIterator<Item = NodeId>,
    ) -> Option<&'d str> {
        match doc.get(node)? {
            XmlNodeData::Comment(_) => nearest_element_name(doc, following),
            XmlNodeData::Element { name, .. } => {
                if self.options.contains(ArrangeOptions::KEEP_IMPORT_WITH_NEXT)
                    && name.local_name == MSB::IMPORT
                {
                    nearest_element_name(doc, following)
                } else {
                    Some(name.local_name.as_str())
                }
            }
            _ => None,
        }
    }

    /// Compares two attached nodes using their current siblings.
    pub fn compare(&self, doc: &XmlDocument, x: NodeId, y: NodeId) -> Ordering {
        let x_name = self.effective_name(doc, x, doc.following_siblings(x));
        let y_name = self.effective_name(doc, y, doc.following_siblings(y));
        self.compare_names(x_name, y_name)
    }

    /// Like [`compare`](Self::compare), but rejects absent nodes.
    pub fn try_compare(&self, doc: &XmlDocument, x: Option<NodeId>, y: Option<NodeId>) -> Result<Ordering> {
        let x = x.ok_or_else(|| ArrangeError::InvalidArgument {
            argument: "x".to_string(),
        })?;
        let y = y.ok_or_else(|| ArrangeError::InvalidArgument {
            argument: "y".to_string(),
        })?;
        Ok(self.compare(doc, x, y))
    }
}

fn nearest_element_name(doc: &XmlDocument, following: impl IntoIterator<Item = NodeId>) -> Option<&str> {
    following
        .into_iter()
        .find_map(|id| doc.get(id).filter(|data| data.is_element()))
        .and_then(XmlNodeData::local_name)
}
