use super::arena::XmlDocument;
use super::namespaces::{XML, XMLNS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{ArrangeError, Result};

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Keep text nodes that consist only of whitespace. Off by default:
    /// layout whitespace is regenerated on output.
    pub preserve_whitespace: bool,
}

pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_with_options(xml, ParseOptions::default())
}

pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = std::str::from_utf8(bytes).map_err(|e| ArrangeError::XmlParse {
        message: e.to_string(),
        location: "input".to_string(),
    })?;
    parse(text.strip_prefix('\u{feff}').unwrap_or(text))
}

pub fn parse_with_options(xml: &str, options: ParseOptions) -> Result<XmlDocument> {
    let doc = roxmltree::Document::parse_with_options(
        xml,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| ArrangeError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();
    let mut seen_root = false;

    for node in doc.root().children() {
        if node.is_element() {
            build_tree(node, &mut xml_doc, None, options);
            seen_root = true;
            continue;
        }
        let Some(data) = top_level_data(node) else {
            continue;
        };
        if seen_root {
            xml_doc.add_epilog(data);
        } else {
            xml_doc.add_prolog(data);
        }
    }

    Ok(xml_doc)
}

fn top_level_data(node: roxmltree::Node) -> Option<XmlNodeData> {
    match node.node_type() {
        roxmltree::NodeType::Comment => node.text().map(XmlNodeData::comment),
        roxmltree::NodeType::PI => node.pi().map(|pi| XmlNodeData::ProcessingInstruction {
            target: pi.target.to_string(),
            data: pi.value.unwrap_or_default().to_string(),
        }),
        _ => None,
    }
}

fn element_data(node: roxmltree::Node) -> XmlNodeData {
    let name = XName::new(
        node.tag_name().namespace().unwrap_or(""),
        node.tag_name().name(),
    );

    let mut attributes: Vec<XAttribute> = node
        .attributes()
        .map(|attr| {
            XAttribute::new(
                XName::new(attr.namespace().unwrap_or(""), attr.name()),
                attr.value(),
            )
        })
        .collect();

    // roxmltree reports every in-scope namespace; keep only the ones this
    // element declares itself so re-emission does not repeat them.
    let parent_namespaces: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.name() == Some(XML::PREFIX) || parent_namespaces.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        match ns.name() {
            Some(prefix) => attributes.push(XAttribute::new(XName::new(XMLNS::NS, prefix), ns.uri())),
            None => attributes.push(XAttribute::new(XName::local(XMLNS::PREFIX), ns.uri())),
        }
    }

    XmlNodeData::Element { name, attributes }
}

fn build_tree(
    node: roxmltree::Node,
    doc: &mut XmlDocument,
    parent: Option<indextree::NodeId>,
    options: ParseOptions,
) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => element_data(node),
        roxmltree::NodeType::Text => match node.text() {
            Some(text) if options.preserve_whitespace || !text.trim().is_empty() => {
                XmlNodeData::text(text)
            }
            _ => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::comment(text),
            None => return,
        },
        roxmltree::NodeType::PI => match top_level_data(node) {
            Some(data) => data,
            None => return,
        },
        roxmltree::NodeType::Root => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id), options);
    }
}
