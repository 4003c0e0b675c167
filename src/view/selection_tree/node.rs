use std::fmt;

/// Unique identifier for a tree node (index into the tree arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The anonymous root node of every tree
    pub const ROOT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Represents a node in the selection tree
///
/// A node is a folder when it has children and a leaf otherwise. Nodes created
/// for a candidate carry its payload; the merge rule in
/// [`SelectionTree::insert`](super::SelectionTree::insert) can leave a node
/// with both a payload and children.
#[derive(Debug, Clone)]
pub struct SelectionNode<P> {
    /// Unique identifier
    pub id: NodeId,
    /// Single path segment shown in browse mode (empty for the root)
    pub name: String,
    /// Payload of the candidate this node was created for
    pub payload: Option<P>,
    /// Full name shown and matched in search mode
    pub full_name: Option<String>,
    /// Parent node ID (None for root and detached nodes)
    pub parent: Option<NodeId>,
    /// Child node IDs in insertion order
    pub children: Vec<NodeId>,
    expanded: bool,
    attached: bool,
}

impl<P> SelectionNode<P> {
    /// Create the anonymous root node
    pub(crate) fn root() -> Self {
        Self {
            id: NodeId::ROOT,
            name: String::new(),
            payload: None,
            full_name: None,
            parent: None,
            children: Vec::new(),
            expanded: true,
            attached: true,
        }
    }

    /// Create a folder node (no payload)
    pub(crate) fn folder(id: NodeId, name: String, parent: NodeId) -> Self {
        Self {
            id,
            name,
            payload: None,
            full_name: None,
            parent: Some(parent),
            children: Vec::new(),
            expanded: false,
            attached: true,
        }
    }

    /// Create a node for a candidate
    pub(crate) fn item(
        id: NodeId,
        name: String,
        parent: NodeId,
        payload: P,
        full_name: String,
    ) -> Self {
        Self {
            id,
            name,
            payload: Some(payload),
            full_name: Some(full_name),
            parent: Some(parent),
            children: Vec::new(),
            expanded: false,
            attached: true,
        }
    }

    /// Check if this node is the tree root
    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// Check if this node is a folder (has children)
    pub fn is_folder(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if this node is a leaf (no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if this node carries a candidate payload
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Check if this node is expanded. Always false for leaves.
    pub fn is_expanded(&self) -> bool {
        self.is_folder() && self.expanded
    }

    /// Set the raw expand flag. Has no visible effect on leaves.
    pub fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    /// Whether the node is still reachable from the root
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
        self.parent = None;
    }

    /// Label for the given display mode: short name while browsing, full
    /// name (falling back to the short name) while searching
    pub fn label(&self, searching: bool) -> &str {
        if searching {
            self.full_name.as_deref().unwrap_or(&self.name)
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let node = SelectionNode::item(
            NodeId(1),
            "Orc".to_string(),
            NodeId::ROOT,
            7u32,
            "Game.Enemy.Orc".to_string(),
        );

        assert_eq!(node.id, NodeId(1));
        assert_eq!(node.parent, Some(NodeId::ROOT));
        assert!(node.is_leaf());
        assert!(node.has_payload());
        assert!(node.is_attached());
        assert_eq!(node.label(false), "Orc");
        assert_eq!(node.label(true), "Game.Enemy.Orc");
    }

    #[test]
    fn test_leaf_is_never_expanded() {
        let mut node: SelectionNode<u32> =
            SelectionNode::folder(NodeId(1), "Game".to_string(), NodeId::ROOT);
        node.set_expanded(true);
        assert!(!node.is_expanded());

        node.children.push(NodeId(2));
        assert!(node.is_folder());
        assert!(node.is_expanded());
    }

    #[test]
    fn test_folder_label_falls_back_to_name() {
        let node: SelectionNode<u32> =
            SelectionNode::folder(NodeId(3), "Enemy".to_string(), NodeId(1));
        assert_eq!(node.label(true), "Enemy");
    }

    #[test]
    fn test_detach() {
        let mut node: SelectionNode<u32> =
            SelectionNode::folder(NodeId(3), "Enemy".to_string(), NodeId(1));
        node.detach();
        assert!(!node.is_attached());
        assert_eq!(node.parent, None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId(4).to_string(), "Node(4)");
        assert!(SelectionNode::<u32>::root().is_root());
    }
}
