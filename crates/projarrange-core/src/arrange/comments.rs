use indextree::NodeId;

use crate::xml::{XmlDocument, XmlNodeData};

/// An element together with the nodes that lead up to it.
///
/// `comments` holds the comments (and any other non-element nodes) found
/// directly before `element`. The final group of a sequence has no element
/// when the sequence ends in comments; it is never sorted and is emitted
/// last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<NodeId>,
    pub element: Option<NodeId>,
}

impl CommentGroup {
    fn new() -> Self {
        Self {
            comments: Vec::new(),
            element: None,
        }
    }

    pub fn is_trailing(&self) -> bool {
        self.element.is_none()
    }
}

pub fn fold_comments(doc: &XmlDocument, nodes: &[NodeId]) -> Vec<CommentGroup> {
    let mut groups = Vec::new();
    let mut current = CommentGroup::new();

    for &node in nodes {
        match doc.get(node) {
            Some(XmlNodeData::Element { .. }) => {
                current.element = Some(node);
                groups.push(std::mem::replace(&mut current, CommentGroup::new()));
            }
            Some(_) => current.comments.push(node),
            None => {}
        }
    }

    if !current.comments.is_empty() {
        groups.push(current);
    }

    groups
}

/// Flattens groups back into nodes. A trailing group is moved to the end
/// wherever the sort left it.
pub fn unfold_comments(groups: Vec<CommentGroup>) -> Vec<NodeId> {
    let (trailing, groups): (Vec<_>, Vec<_>) = groups.into_iter().partition(CommentGroup::is_trailing);

    groups
        .into_iter()
        .chain(trailing)
        .flat_map(|group| group.comments.into_iter().chain(group.element))
        .collect()
}
