use super::arena::XmlDocument;
use super::namespaces::{XML, XMLNS};
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{ArrangeError, Result};
use indextree::NodeId;
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

/// Serializer layout switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
    /// Emit `<?xml version="1.0" encoding="utf-8"?>` first.
    pub declaration: bool,
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }

    pub fn pretty() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

/// Compact single-line serialization with an XML declaration.
pub fn serialize(doc: &XmlDocument) -> Result<String> {
    serialize_with(doc, WriteOptions::compact())
}

/// Indented serialization with an XML declaration, as written by the CLI.
pub fn serialize_pretty(doc: &XmlDocument) -> Result<String> {
    serialize_with(doc, WriteOptions::pretty())
}

pub fn serialize_with(doc: &XmlDocument, options: WriteOptions) -> Result<String> {
    let bytes = serialize_bytes(doc, options)?;
    String::from_utf8(bytes).map_err(|e| ArrangeError::XmlWrite(e.to_string()))
}

/// Serialize a subtree starting from a specific node (no XML declaration).
/// Namespace declarations inherited from ancestors are written on the
/// subtree's top element so the fragment stays well-formed.
pub fn serialize_subtree(doc: &XmlDocument, node_id: NodeId) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let Some(node_data) = doc.get(node_id) else {
        return Ok(String::new());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            let mut merged_attrs = attributes.clone();
            let mut declared: HashSet<XName> = merged_attrs
                .iter()
                .filter(|attr| attr.name.is_namespace_declaration())
                .map(|attr| attr.name.clone())
                .collect();

            merged_attrs.extend(collect_ancestor_namespace_attrs(doc, node_id, &mut declared));

            write_element_with_attrs(doc, node_id, name, &merged_attrs, &mut writer, &NamespaceMap::new())?;
        }
        _ => write_node(doc, node_id, &mut writer, &NamespaceMap::new())?,
    }

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| ArrangeError::XmlWrite(e.to_string()))
}

pub fn serialize_bytes(doc: &XmlDocument, options: WriteOptions) -> Result<Vec<u8>> {
    let mut writer = match options.indent {
        Some(width) => Writer::new_with_indent(Cursor::new(Vec::new()), b' ', width),
        None => Writer::new(Cursor::new(Vec::new())),
    };

    if options.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(write_error)?;
    }

    let namespace_map = NamespaceMap::new();
    for &id in doc.prolog() {
        write_node(doc, id, &mut writer, &namespace_map)?;
    }
    if let Some(root_id) = doc.root() {
        write_node(doc, root_id, &mut writer, &namespace_map)?;
    }
    for &id in doc.epilog() {
        write_node(doc, id, &mut writer, &namespace_map)?;
    }

    Ok(writer.into_inner().into_inner())
}

/// Namespace URI to prefix; the default namespace maps to an empty prefix.
type NamespaceMap = HashMap<String, String>;

fn write_error(e: impl std::fmt::Display) -> ArrangeError {
    ArrangeError::XmlWrite(e.to_string())
}

/// Escapes markup characters and double quotes only, so MSBuild
/// conditions such as `'$(Configuration)' == 'Debug'` stay readable.
fn escape_attribute_value(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}

fn collect_ancestor_namespace_attrs(
    doc: &XmlDocument,
    node_id: NodeId,
    declared: &mut HashSet<XName>,
) -> Vec<XAttribute> {
    let mut collected = Vec::new();

    for ancestor_id in doc.ancestors(node_id).skip(1) {
        let Some(attrs) = doc.get(ancestor_id).and_then(XmlNodeData::attributes) else {
            continue;
        };

        for attr in attrs {
            if attr.name.is_namespace_declaration() && declared.insert(attr.name.clone()) {
                collected.push(attr.clone());
            }
        }
    }

    collected
}

fn extend_namespace_map(namespace_map: &mut NamespaceMap, attributes: &[XAttribute]) {
    for attr in attributes.iter().filter(|attr| attr.name.is_namespace_declaration()) {
        let prefix = match attr.name.namespace {
            Some(_) => attr.name.local_name.clone(),
            None => String::new(),
        };
        namespace_map.insert(attr.value.clone(), prefix);
    }
}

fn element_prefix<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    match namespace_map.get(namespace) {
        Some(prefix) => prefix.as_str(),
        None if namespace == XML::NS => XML::PREFIX,
        None => "",
    }
}

fn attribute_prefix<'a>(namespace: &str, namespace_map: &'a NamespaceMap) -> &'a str {
    if namespace == XMLNS::NS {
        return XMLNS::PREFIX;
    }
    if namespace == XML::NS {
        return XML::PREFIX;
    }
    namespace_map.get(namespace).map(String::as_str).unwrap_or("")
}

fn qualified(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: NodeId,
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element_with_attrs(doc, node_id, name, attributes, writer, namespace_map)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                .map_err(write_error)?;
        }
        XmlNodeData::CData(text) => {
            writer
                .write_event(Event::CData(BytesCData::new(text.as_str())))
                .map_err(write_error)?;
        }
        XmlNodeData::Comment(text) => {
            // Comment bodies are written verbatim; escaping would alter them.
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(write_error)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(pi_content.as_str())))
                .map_err(write_error)?;
        }
    }

    Ok(())
}

fn write_element_with_attrs<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    namespace_map: &NamespaceMap,
) -> Result<()> {
    let mut scoped_map = namespace_map.clone();
    extend_namespace_map(&mut scoped_map, attributes);

    let tag_name = match &name.namespace {
        Some(ns) => qualified(element_prefix(ns, &scoped_map), &name.local_name),
        None => name.local_name.clone(),
    };

    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = match &attr.name.namespace {
            Some(ns) => qualified(attribute_prefix(ns, &scoped_map), &attr.name.local_name),
            None => attr.name.local_name.clone(),
        };
        elem.push_attribute(Attribute {
            key: QName(attr_name.as_bytes()),
            value: Cow::Owned(escape_attribute_value(&attr.value).into_bytes()),
        });
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer.write_event(Event::Empty(elem)).map_err(write_error)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_error)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scoped_map)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_error)?;
    }

    Ok(())
}
