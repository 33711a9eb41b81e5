use super::node::XmlNodeData;
use indextree::{Arena, NodeId};

/// Arena-backed XML document.
///
/// Nodes are addressed by `NodeId`. Detached nodes stay alive in the arena
/// and can be re-attached anywhere, which is what reordering relies on.
/// Comments and processing instructions outside the root element live in
/// `prolog` (before the root) and `epilog` (after it).
#[derive(Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
    prolog: Vec<NodeId>,
    epilog: Vec<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            prolog: Vec::new(),
            epilog: Vec::new(),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn prolog(&self) -> &[NodeId] {
        &self.prolog
    }

    pub fn epilog(&self) -> &[NodeId] {
        &self.epilog
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    /// Adds a top-level node that precedes the root element.
    pub fn add_prolog(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.prolog.push(id);
        id
    }

    /// Adds a top-level node that follows the root element.
    pub fn add_epilog(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.epilog.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    /// Creates a node directly after `sibling`.
    pub fn add_after(&mut self, sibling: NodeId, data: XmlNodeData) -> NodeId {
        let new_node = self.arena.new_node(data);
        sibling.insert_after(new_node, &mut self.arena);
        new_node
    }

    /// Moves an existing node (with its subtree) to the end of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    pub fn remove(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
    }

    /// Replaces the children of `parent` with `nodes`, in the given order.
    ///
    /// Previous children that are not listed end up detached.
    pub fn replace_children(&mut self, parent: NodeId, nodes: &[NodeId]) {
        let current: Vec<NodeId> = parent.children(&self.arena).collect();
        for child in current {
            child.detach(&mut self.arena);
        }
        for &node in nodes {
            parent.append(node, &mut self.arena);
        }
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// Element children only, skipping comments and text.
    pub fn child_elements(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&child| self.get(child).is_some_and(XmlNodeData::is_element))
    }

    /// Siblings after `node`, in document order, not including `node`.
    pub fn following_siblings(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.following_siblings(&self.arena).skip(1)
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(XmlNodeData::local_name)
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
