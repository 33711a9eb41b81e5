use super::xname::{XAttribute, XName};

#[derive(Clone, Debug, PartialEq)]
pub enum XmlNodeData {
    Element {
        name: XName,
        attributes: Vec<XAttribute>,
    },
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
}

impl XmlNodeData {
    pub fn element(name: XName) -> Self {
        Self::Element {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn comment(content: &str) -> Self {
        Self::Comment(content.to_string())
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }

    pub fn name(&self) -> Option<&XName> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Local tag name of an element; `None` for every other node kind.
    pub fn local_name(&self) -> Option<&str> {
        self.name().map(|name| name.local_name.as_str())
    }

    pub fn attributes(&self) -> Option<&[XAttribute]> {
        match self {
            Self::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn comment_text(&self) -> Option<&str> {
        match self {
            Self::Comment(s) => Some(s),
            _ => None,
        }
    }

    /// Element header (name and attributes) without any children.
    pub fn shallow_element_copy(&self) -> Option<Self> {
        match self {
            Self::Element { name, attributes } => Some(Self::Element {
                name: name.clone(),
                attributes: attributes.clone(),
            }),
            _ => None,
        }
    }
}
