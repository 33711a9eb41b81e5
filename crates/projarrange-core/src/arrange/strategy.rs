//! Arrangement driver.
//!
//! Per section, in order:
//! 1. combine root elements sharing name and attributes (optional) and sort
//!    every root element's subtree by name, then by sort attributes;
//! 2. split mixed `ItemGroup` elements (optional);
//! 3. sort the section's root-level nodes (optional).

use std::cmp::Ordering;
use std::collections::HashMap;

use indextree::NodeId;
use log::{debug, trace};

use super::attribute_key::AttributeKeyComparer;
use super::comments::{fold_comments, unfold_comments};
use super::node_name::NodeNameComparer;
use super::options::ArrangeOptions;
use super::sections::{fold_sections, order_sections, unfold_sections, Section};
use super::settings::{ArrangeSettings, ResolvedSettings};
use crate::error::{ArrangeError, Result};
use crate::util::{distinct_by_key, group_by_key};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData, MSB};

/// What a node sorts by: its effective name, then its attributes.
#[derive(Debug, Clone, Copy)]
struct SortKey<'d> {
    name: Option<&'d str>,
    attributes: Option<&'d [XAttribute]>,
}

/// Both comparers, built for one set of resolved options.
#[derive(Debug, Clone, Copy)]
struct Comparers<'a> {
    node_name: NodeNameComparer<'a>,
    attribute_key: AttributeKeyComparer<'a>,
}

impl<'a> Comparers<'a> {
    fn compare(&self, x: &SortKey<'_>, y: &SortKey<'_>) -> Ordering {
        self.node_name
            .compare_names(x.name, y.name)
            .then_with(|| self.attribute_key.compare(x.attributes, y.attributes))
    }

    /// Keys for `nodes` in their current order. A comment takes the whole
    /// key of the nearest element after it, so it stays directly in front
    /// of that element. Other non-element nodes have neither name nor
    /// attributes.
    fn sort_keys<'d>(&self, doc: &'d XmlDocument, nodes: &[NodeId]) -> Vec<SortKey<'d>> {
        let unnamed = SortKey {
            name: None,
            attributes: None,
        };
        let mut next_element: Option<SortKey<'d>> = None;
        let mut keys: Vec<SortKey<'d>> = nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(index, &node)| match doc.get(node) {
                Some(data @ XmlNodeData::Element { .. }) => {
                    let key = SortKey {
                        name: self
                            .node_name
                            .effective_name(doc, node, nodes[index + 1..].iter().copied()),
                        attributes: data.attributes(),
                    };
                    next_element = Some(key);
                    key
                }
                Some(XmlNodeData::Comment(_)) => next_element.unwrap_or(unnamed),
                _ => unnamed,
            })
            .collect();
        keys.reverse();
        keys
    }

    /// Stable sort of `nodes`, names resolved against their current order.
    /// Non-element nodes after the last element stay at the end.
    fn sort_nodes(&self, doc: &XmlDocument, nodes: &[NodeId]) -> Vec<NodeId> {
        let keys = self.sort_keys(doc, nodes);
        let sortable = nodes
            .iter()
            .rposition(|&node| doc.get(node).is_some_and(XmlNodeData::is_element))
            .map_or(0, |last| last + 1);

        let mut order: Vec<usize> = (0..sortable).collect();
        order.sort_by(|&x, &y| self.compare(&keys[x], &keys[y]));
        order
            .into_iter()
            .chain(sortable..nodes.len())
            .map(|index| nodes[index])
            .collect()
    }

    /// Stable sort that moves leading comments together with their element.
    fn sort_nodes_with_comments(&self, doc: &XmlDocument, nodes: &[NodeId]) -> Vec<NodeId> {
        let keys: HashMap<NodeId, SortKey<'_>> = nodes
            .iter()
            .copied()
            .zip(self.sort_keys(doc, nodes))
            .collect();

        let mut groups = fold_comments(doc, nodes);
        groups.sort_by(|x, y| match (x.element, y.element) {
            (Some(x), Some(y)) => self.compare(&keys[&x], &keys[&y]),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        unfold_comments(groups)
    }
}

/// Arranges project documents according to resolved settings.
#[derive(Debug, Clone, Default)]
pub struct ArrangeStrategy {
    settings: ResolvedSettings,
}

impl ArrangeStrategy {
    pub fn new(settings: &ArrangeSettings) -> Self {
        Self::from_resolved(settings.resolve())
    }

    pub fn from_resolved(settings: ResolvedSettings) -> Self {
        Self { settings }
    }

    /// Arranges `doc` in place.
    ///
    /// Fails only when the document has no root element.
    pub fn arrange(&self, doc: &mut XmlDocument) -> Result<()> {
        let root = doc.root().ok_or(ArrangeError::MissingRoot)?;
        let children: Vec<NodeId> = doc.children(root).collect();

        let mut sections = order_sections(fold_sections(doc, &children));
        debug!("arranging {} section(s)", sections.len());

        for section in &mut sections {
            let options = section.resolve_options(self.settings.options);
            trace!("section options: {}", options);
            self.arrange_section(doc, section, options);
        }

        let nodes = unfold_sections(sections);
        doc.replace_children(root, &nodes);
        Ok(())
    }

    fn comparers(&self, options: ArrangeOptions) -> Comparers<'_> {
        Comparers {
            node_name: NodeNameComparer::new(&self.settings.sticky_element_names, options),
            attribute_key: AttributeKeyComparer::new(&self.settings.sort_attributes),
        }
    }

    fn arrange_section(&self, doc: &mut XmlDocument, section: &mut Section, options: ArrangeOptions) {
        let comparers = self.comparers(options);

        self.combine_root_elements_and_sort(doc, section, options, &comparers);

        if options.contains(ArrangeOptions::SPLIT_ITEM_GROUPS) {
            self.split_item_groups(doc, section);
        }

        if options.contains(ArrangeOptions::SORT_ROOT_ELEMENTS) {
            section.nodes = if options.contains(ArrangeOptions::KEEP_COMMENT_WITH_NEXT) {
                comparers.sort_nodes_with_comments(doc, &section.nodes)
            } else {
                comparers.sort_nodes(doc, &section.nodes)
            };
        }
    }

    fn combine_root_elements_and_sort(
        &self,
        doc: &mut XmlDocument,
        section: &mut Section,
        options: ArrangeOptions,
        comparers: &Comparers<'_>,
    ) {
        let elements: Vec<NodeId> = section
            .nodes
            .iter()
            .copied()
            .filter(|&node| doc.get(node).is_some_and(XmlNodeData::is_element))
            .collect();
        let groups = group_by_key(elements, |&node| combine_key(doc, node));

        for (_, group) in groups {
            let group = if options.contains(ArrangeOptions::COMBINE_ROOT_ELEMENTS) {
                combine_identical_elements(doc, section, group)
            } else {
                group
            };

            for element in group {
                self.arrange_element(doc, element, comparers);
            }
        }
    }

    /// Sorts the children of `element` and of every element below it.
    /// Keep-order elements leave their own children alone but their
    /// descendants are still sorted.
    fn arrange_element(&self, doc: &mut XmlDocument, element: NodeId, comparers: &Comparers<'_>) {
        let mut pending = vec![element];

        while let Some(current) = pending.pop() {
            let keep_order = doc
                .local_name(current)
                .is_some_and(|name| self.settings.is_keep_order(name));

            let children: Vec<NodeId> = doc.children(current).collect();
            if !keep_order && children.len() > 1 {
                let sorted = comparers.sort_nodes(doc, &children);
                if sorted != children {
                    doc.replace_children(current, &sorted);
                }
            }

            pending.extend(doc.child_elements(current));
        }
    }

    /// Splits every root `ItemGroup` holding more than one item type into
    /// one `ItemGroup` per type. Types are ordered sticky-first, then by
    /// name; the first type stays in the original element. The others are
    /// inserted right after it in reverse order, each as a new sibling with
    /// the same attributes, which leaves them in type order.
    fn split_item_groups(&self, doc: &mut XmlDocument, section: &mut Section) {
        let item_groups: Vec<NodeId> = section
            .nodes
            .iter()
            .copied()
            .filter(|&node| doc.local_name(node) == Some(MSB::ITEM_GROUP))
            .collect();

        for group in item_groups {
            let item_types = self.ordered_item_types(doc, group);
            if item_types.len() < 2 {
                continue;
            }

            let Some(header) = doc.get(group).and_then(XmlNodeData::shallow_element_copy) else {
                continue;
            };
            let Some(position) = section.nodes.iter().position(|&node| node == group) else {
                continue;
            };
            debug!("splitting {} into {} groups", MSB::ITEM_GROUP, item_types.len());

            for item_type in item_types[1..].iter().rev() {
                let items: Vec<NodeId> = doc
                    .child_elements(group)
                    .filter(|&child| doc.get(child).and_then(XmlNodeData::name) == Some(item_type))
                    .collect();
                let new_group = doc.add_after(group, header.clone());
                for item in items {
                    doc.append(new_group, item);
                }
                section.nodes.insert(position + 1, new_group);
            }
        }
    }

    fn ordered_item_types(&self, doc: &XmlDocument, group: NodeId) -> Vec<XName> {
        let mut item_types = distinct_by_key(doc.child_elements(group), |&child| {
            doc.get(child).and_then(XmlNodeData::name).cloned()
        })
        .into_iter()
        .flatten()
        .collect::<Vec<XName>>();

        let sticky = &self.settings.sticky_element_names;
        item_types.sort_by(|x, y| {
            let x_index = sticky.iter().position(|name| *name == x.local_name).unwrap_or(usize::MAX);
            let y_index = sticky.iter().position(|name| *name == y.local_name).unwrap_or(usize::MAX);
            x_index.cmp(&y_index).then_with(|| x.local_name.cmp(&y.local_name))
        });
        item_types
    }
}

/// Combine key: expanded element name plus the serialized attribute set.
fn combine_key(doc: &XmlDocument, node: NodeId) -> (String, String) {
    match doc.get(node) {
        Some(XmlNodeData::Element { name, attributes }) => {
            (name.expanded(), XAttribute::serialize_set(attributes))
        }
        _ => (String::new(), String::new()),
    }
}

/// Moves the children of every element after the first into the first,
/// then drops the emptied elements from the section and the document.
/// Returns the elements that remain.
fn combine_identical_elements(doc: &mut XmlDocument, section: &mut Section, group: Vec<NodeId>) -> Vec<NodeId> {
    let mut group = group.into_iter();
    let Some(first) = group.next() else {
        return Vec::new();
    };

    let rest: Vec<NodeId> = group.collect();
    if !rest.is_empty() {
        debug!(
            "combining {} duplicate {} element(s)",
            rest.len(),
            doc.local_name(first).unwrap_or_default()
        );
    }

    for duplicate in rest {
        let children: Vec<NodeId> = doc.children(duplicate).collect();
        for child in children {
            doc.append(first, child);
        }
        section.nodes.retain(|&node| node != duplicate);
        doc.remove(duplicate);
    }

    vec![first]
}

/// Arranges `doc` in place with `settings`.
pub fn arrange_document(doc: &mut XmlDocument, settings: &ArrangeSettings) -> Result<()> {
    ArrangeStrategy::new(settings).arrange(doc)
}
