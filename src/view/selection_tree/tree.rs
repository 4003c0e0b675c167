use super::node::{NodeId, SelectionNode};
use crate::candidate::Candidate;

/// Path separator used by candidate display paths
pub const PATH_SEPARATOR: char = '/';

/// Folder hierarchy built from `/`-separated candidate paths
///
/// Nodes live in a single arena and reference each other by [`NodeId`]. The
/// root is always `NodeId::ROOT`; it is anonymous and never displayed. Nodes
/// are only ever created, never freed: a node replaced by the merge rule stays
/// in the arena but is detached from the hierarchy.
#[derive(Debug, Clone)]
pub struct SelectionTree<P> {
    /// All nodes indexed by ID
    nodes: Vec<SelectionNode<P>>,
}

impl<P> Default for SelectionTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SelectionTree<P> {
    /// Create a tree holding just the root
    pub fn new() -> Self {
        Self {
            nodes: vec![SelectionNode::root()],
        }
    }

    /// Build a tree from a candidate snapshot
    pub fn build<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate<P>>,
    {
        let mut tree = Self::new();
        for candidate in candidates {
            tree.insert(&candidate.display_path, candidate.full_name, candidate.payload);
        }
        tree.relink_parents();
        tracing::debug!(
            nodes = tree.node_count(),
            leaves = tree.payload_nodes().len(),
            "built selection tree"
        );
        tree
    }

    /// Insert a candidate at `path`, creating intermediate folders as needed
    ///
    /// If a child with the final segment's name already exists, it is removed
    /// from its parent and all of its children are moved onto the new node,
    /// so items registered "under" this path earlier are kept.
    pub fn insert(&mut self, path: &str, full_name: impl Into<String>, payload: P) -> NodeId {
        let (folders, leaf_name) = split_path(path);

        let mut current = NodeId::ROOT;
        for folder in folders {
            current = match self.find_child(current, folder) {
                Some(id) => id,
                None => self.add_folder(current, folder),
            };
        }

        let id = NodeId(self.nodes.len());
        let mut node =
            SelectionNode::item(id, leaf_name.to_string(), current, payload, full_name.into());

        if let Some(existing) = self.find_child(current, leaf_name) {
            let inherited = std::mem::take(&mut self.nodes[existing.0].children);
            for &child in &inherited {
                self.nodes[child.0].parent = Some(id);
            }
            self.nodes[current.0].children.retain(|&child| child != existing);
            self.nodes[existing.0].detach();
            tracing::trace!(
                path,
                replaced = %existing,
                moved = inherited.len(),
                "merged colliding node"
            );
            node.children = inherited;
        }

        self.nodes.push(node);
        self.nodes[current.0].children.push(id);
        id
    }

    /// Add a new folder under `parent`
    fn add_folder(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(SelectionNode::folder(id, name.to_string(), parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID (detached nodes included)
    pub fn get_node(&self, id: NodeId) -> Option<&SelectionNode<P>> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by ID
    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SelectionNode<P>> {
        self.nodes.get_mut(id.0)
    }

    /// Whether `id` names a node that is still part of the hierarchy
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(|node| node.is_attached())
    }

    /// Number of attached nodes, root excluded
    pub fn node_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.is_attached() && !node.is_root())
            .count()
    }

    /// True when there is nothing to display
    pub fn is_empty(&self) -> bool {
        self.nodes[NodeId::ROOT.0].children.is_empty()
    }

    /// Direct child of `parent` named `name`
    ///
    /// Scans from the most recently added child backward: while building, the
    /// folder being looked up is usually the one created last.
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let node = self.get_node(parent)?;
        node.children
            .iter()
            .rev()
            .copied()
            .find(|&child| self.nodes[child.0].name == name)
    }

    /// Lazy pre-order traversal starting at `start`
    ///
    /// Each call returns a fresh iterator, so the traversal can be restarted.
    pub fn enumerate_depth_first(&self, start: NodeId, include_start: bool) -> DepthFirst<'_, P> {
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(start) {
            if include_start {
                stack.push(start);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        DepthFirst { tree: self, stack }
    }

    /// Reset every attached node's parent link to its structural parent
    pub fn relink_parents(&mut self) {
        self.nodes[NodeId::ROOT.0].parent = None;
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            for index in 0..self.nodes[id.0].children.len() {
                let child = self.nodes[id.0].children[index];
                self.nodes[child.0].parent = Some(id);
                stack.push(child);
            }
        }
    }

    /// Ancestors of `id`, nearest first, root excluded
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, P> {
        let next = self.get_node(id).and_then(|node| node.parent);
        Ancestors { tree: self, next }
    }

    /// Display depth of a node (0 for children of the root)
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// `/`-joined names from the top-level folder down to `id`
    pub fn full_path(&self, id: NodeId) -> String {
        let Some(node) = self.get_node(id) else {
            return String::new();
        };
        let mut parts: Vec<&str> = self
            .ancestors(id)
            .filter_map(|ancestor| self.get_node(ancestor))
            .map(|ancestor| ancestor.name.as_str())
            .collect();
        parts.reverse();
        parts.push(&node.name);
        parts.join("/")
    }

    /// Find a node by its display path
    pub fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let (folders, leaf_name) = split_path(path);
        let mut current = NodeId::ROOT;
        for folder in folders {
            current = self.find_child(current, folder)?;
        }
        self.find_child(current, leaf_name)
    }

    /// Find the first attached node carrying `payload`
    pub fn find_by_payload(&self, payload: &P) -> Option<NodeId>
    where
        P: PartialEq,
    {
        self.enumerate_depth_first(NodeId::ROOT, false)
            .find(|&id| self.nodes[id.0].payload.as_ref() == Some(payload))
    }

    /// Get all visible rows in tree order with their depth
    ///
    /// A row is visible when every folder above it is expanded.
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        let mut visible = Vec::new();
        for &child in &self.nodes[NodeId::ROOT.0].children {
            self.collect_visible_recursive(child, 0, &mut visible);
        }
        visible
    }

    /// Recursively collect visible nodes
    fn collect_visible_recursive(&self, id: NodeId, depth: usize, visible: &mut Vec<(NodeId, usize)>) {
        visible.push((id, depth));

        if let Some(node) = self.get_node(id) {
            if node.is_expanded() {
                for &child_id in &node.children {
                    self.collect_visible_recursive(child_id, depth + 1, visible);
                }
            }
        }
    }

    /// Nodes carrying a payload, in enumeration order
    pub fn payload_nodes(&self) -> Vec<NodeId> {
        self.enumerate_depth_first(NodeId::ROOT, false)
            .filter(|&id| self.nodes[id.0].has_payload())
            .collect()
    }

    /// Whether the node is an expanded folder
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(|node| node.is_expanded())
    }

    /// Set the expand flag of one node
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.get_node_mut(id) {
            node.set_expanded(expanded);
        }
    }

    /// Set the expand flag of `id` and every node below it
    pub fn set_expanded_recursive(&mut self, id: NodeId, expanded: bool) {
        let subtree: Vec<NodeId> = self.enumerate_depth_first(id, true).collect();
        for node_id in subtree {
            self.set_expanded(node_id, expanded);
        }
    }

    /// Expand every folder in the tree
    pub fn expand_all(&mut self) {
        let all: Vec<NodeId> = self.enumerate_depth_first(NodeId::ROOT, false).collect();
        for id in all {
            self.set_expanded(id, true);
        }
    }

    /// Folders in enumeration order
    pub fn folders(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.enumerate_depth_first(NodeId::ROOT, false)
            .filter(|&id| self.nodes[id.0].is_folder())
    }
}

/// Split a display path into (folders, leaf name)
///
/// Empty segments are dropped. A path with no segments at all becomes a
/// single leaf named after the raw string.
fn split_path(path: &str) -> (Vec<&str>, &str) {
    let mut segments: Vec<&str> = path
        .split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .collect();
    match segments.pop() {
        Some(leaf) => (segments, leaf),
        None => (Vec::new(), path),
    }
}

/// Pre-order iterator returned by [`SelectionTree::enumerate_depth_first`]
pub struct DepthFirst<'a, P> {
    tree: &'a SelectionTree<P>,
    stack: Vec<NodeId>,
}

impl<P> Iterator for DepthFirst<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.get_node(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

/// Upward iterator returned by [`SelectionTree::ancestors`]
pub struct Ancestors<'a, P> {
    tree: &'a SelectionTree<P>,
    next: Option<NodeId>,
}

impl<P> Iterator for Ancestors<'_, P> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.filter(|&id| id != NodeId::ROOT)?;
        self.next = self.tree.get_node(id).and_then(|node| node.parent);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tree_from(paths: &[&str]) -> SelectionTree<String> {
        SelectionTree::build(
            paths
                .iter()
                .map(|path| Candidate::new(*path, *path, path.to_string())),
        )
    }

    fn child_names(tree: &SelectionTree<String>, id: NodeId) -> Vec<String> {
        tree.get_node(id)
            .unwrap()
            .children
            .iter()
            .map(|&child| tree.get_node(child).unwrap().name.clone())
            .collect()
    }

    /// Nested description of the tree with children sorted by name
    fn shape(tree: &SelectionTree<String>, id: NodeId) -> Vec<(String, bool, Vec<String>)> {
        let mut out: Vec<(String, bool, Vec<String>)> = tree
            .enumerate_depth_first(id, false)
            .map(|node_id| {
                let mut names = child_names(tree, node_id);
                names.sort();
                let node = tree.get_node(node_id).unwrap();
                (tree.full_path(node_id), node.has_payload(), names)
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_tree_creation() {
        let tree: SelectionTree<String> = SelectionTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert!(tree.get_node(tree.root_id()).unwrap().is_root());
    }

    #[test]
    fn test_shared_folders() {
        let tree = tree_from(&["A/B/C", "A/B/D"]);

        let root = tree.root_id();
        assert_eq!(child_names(&tree, root), vec!["A"]);
        let a = tree.find_child(root, "A").unwrap();
        assert_eq!(child_names(&tree, a), vec!["B"]);
        let b = tree.find_child(a, "B").unwrap();
        assert_eq!(child_names(&tree, b), vec!["C", "D"]);

        let c = tree.find_child(b, "C").unwrap();
        assert!(tree.get_node(c).unwrap().is_leaf());
        assert_eq!(tree.get_node(c).unwrap().payload.as_deref(), Some("A/B/C"));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_leaf_then_nested_item() {
        let tree = tree_from(&["A/B", "A/B/C"]);

        let b = tree.find_by_path("A/B").unwrap();
        assert!(tree.get_node(b).unwrap().is_folder());
        assert_eq!(child_names(&tree, b), vec!["C"]);
        let c = tree.find_by_path("A/B/C").unwrap();
        assert_eq!(tree.get_node(c).unwrap().parent, Some(b));
    }

    #[test]
    fn test_merge_keeps_children_registered_first() {
        let tree = tree_from(&["A/B/C", "A/B/D", "A/B"]);

        let a = tree.find_by_path("A").unwrap();
        assert_eq!(child_names(&tree, a), vec!["B"]);

        let b = tree.find_by_path("A/B").unwrap();
        let node = tree.get_node(b).unwrap();
        assert_eq!(node.payload.as_deref(), Some("A/B"));
        assert_eq!(child_names(&tree, b), vec!["C", "D"]);
        for &child in &node.children {
            assert_eq!(tree.get_node(child).unwrap().parent, Some(b));
        }
    }

    #[test]
    fn test_merge_detaches_replaced_node() {
        let mut tree: SelectionTree<u32> = SelectionTree::new();
        let first = tree.insert("A/B", "A.B", 1);
        let second = tree.insert("A/B", "A.B", 2);

        assert_ne!(first, second);
        assert!(!tree.contains(first));
        assert!(tree.contains(second));
        assert_eq!(tree.find_by_path("A/B"), Some(second));
        assert_eq!(tree.find_by_payload(&1), None);
        assert_eq!(tree.find_by_payload(&2), Some(second));
        // Newest entry is appended last
        let a = tree.find_by_path("A").unwrap();
        assert_eq!(tree.get_node(a).unwrap().children, vec![second]);
    }

    #[test]
    fn test_malformed_paths() {
        let mut tree: SelectionTree<u32> = SelectionTree::new();
        let empty = tree.insert("", "Empty", 1);
        let slashes = tree.insert("///", "Slashes", 2);
        let padded = tree.insert("/Game//Orc/", "Game.Orc", 3);

        assert_eq!(tree.get_node(empty).unwrap().parent, Some(NodeId::ROOT));
        assert_eq!(tree.get_node(empty).unwrap().name, "");
        assert_eq!(tree.get_node(slashes).unwrap().name, "///");
        assert_eq!(tree.get_node(slashes).unwrap().parent, Some(NodeId::ROOT));
        assert_eq!(tree.full_path(padded), "Game/Orc");
        assert_eq!(tree.find_by_path("///"), Some(slashes));
    }

    #[test]
    fn test_find_child_prefers_latest() {
        let tree = tree_from(&["X", "Y", "Z"]);
        let root = tree.root_id();
        let z = tree.find_child(root, "Z").unwrap();
        assert_eq!(tree.get_node(z).unwrap().name, "Z");
        assert_eq!(tree.find_child(root, "missing"), None);
        assert_eq!(tree.find_child(NodeId(999), "X"), None);
    }

    #[test]
    fn test_enumerate_depth_first_is_preorder() {
        let tree = tree_from(&["A/B/C", "A/D", "E"]);
        let names: Vec<String> = tree
            .enumerate_depth_first(tree.root_id(), false)
            .map(|id| tree.get_node(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);

        let with_root: Vec<NodeId> = tree.enumerate_depth_first(tree.root_id(), true).collect();
        assert_eq!(with_root.len(), 6);
        assert_eq!(with_root[0], NodeId::ROOT);

        // Restartable
        assert_eq!(tree.enumerate_depth_first(tree.root_id(), false).count(), 5);
        assert_eq!(tree.enumerate_depth_first(tree.root_id(), false).count(), 5);
    }

    #[test]
    fn test_relink_parents_repairs_links() {
        let mut tree = tree_from(&["A/B/C"]);
        let c = tree.find_by_path("A/B/C").unwrap();
        let b = tree.find_by_path("A/B").unwrap();
        tree.get_node_mut(c).unwrap().parent = None;

        tree.relink_parents();
        assert_eq!(tree.get_node(c).unwrap().parent, Some(b));
        assert_eq!(tree.get_node(tree.root_id()).unwrap().parent, None);
    }

    #[test]
    fn test_ancestors_and_depth() {
        let tree = tree_from(&["Game/Enemy/Orc"]);
        let orc = tree.find_by_path("Game/Enemy/Orc").unwrap();
        let enemy = tree.find_by_path("Game/Enemy").unwrap();
        let game = tree.find_by_path("Game").unwrap();

        let ancestors: Vec<NodeId> = tree.ancestors(orc).collect();
        assert_eq!(ancestors, vec![enemy, game]);
        assert_eq!(tree.depth(orc), 2);
        assert_eq!(tree.depth(game), 0);
        assert_eq!(tree.full_path(orc), "Game/Enemy/Orc");
    }

    #[test]
    fn test_visible_rows() {
        let mut tree = tree_from(&["Game/Enemy/Goblin", "Game/Enemy/Orc", "Game/Player"]);
        let game = tree.find_by_path("Game").unwrap();
        let enemy = tree.find_by_path("Game/Enemy").unwrap();

        assert_eq!(tree.visible_rows(), vec![(game, 0)]);

        tree.set_expanded(game, true);
        let player = tree.find_by_path("Game/Player").unwrap();
        assert_eq!(tree.visible_rows(), vec![(game, 0), (enemy, 1), (player, 1)]);

        tree.set_expanded(enemy, true);
        assert_eq!(tree.visible_rows().len(), 5);
    }

    #[test]
    fn test_expand_all_and_recursive() {
        let mut tree = tree_from(&["A/B/C", "D/E"]);
        tree.expand_all();
        assert_eq!(tree.visible_rows().len(), 5);
        assert_eq!(tree.folders().count(), 3);

        let a = tree.find_by_path("A").unwrap();
        tree.set_expanded_recursive(a, false);
        assert!(!tree.is_expanded(a));
        assert!(!tree.is_expanded(tree.find_by_path("A/B").unwrap()));
        assert!(tree.is_expanded(tree.find_by_path("D").unwrap()));
    }

    #[test]
    fn test_payload_nodes_in_enumeration_order() {
        let tree = tree_from(&["B/Two", "A", "B/One"]);
        let names: Vec<String> = tree
            .payload_nodes()
            .into_iter()
            .map(|id| tree.get_node(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["Two", "One", "A"]);
    }

    proptest! {
        #[test]
        fn prop_shape_is_independent_of_insertion_order(
            order in Just(vec![
                "Game/Enemy/Goblin",
                "Game/Enemy/Orc",
                "Game/Player",
                "Tools/Brush",
                "Tools/Eraser/Soft",
                "Root",
            ]).prop_shuffle()
        ) {
            let reference = tree_from(&[
                "Game/Enemy/Goblin",
                "Game/Enemy/Orc",
                "Game/Player",
                "Tools/Brush",
                "Tools/Eraser/Soft",
                "Root",
            ]);
            let shuffled = tree_from(&order);
            prop_assert_eq!(shape(&reference, NodeId::ROOT), shape(&shuffled, NodeId::ROOT));
        }

        #[test]
        fn prop_sibling_names_are_unique(
            paths in proptest::collection::vec("[ab]{1,2}(/[ab]{1,2}){0,2}", 1..20)
        ) {
            let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
            let tree = tree_from(&refs);
            for id in tree.enumerate_depth_first(NodeId::ROOT, true) {
                let mut names = child_names(&tree, id);
                let total = names.len();
                names.sort();
                names.dedup();
                prop_assert_eq!(names.len(), total);
            }
            for path in &paths {
                prop_assert!(tree.find_by_path(path).is_some());
            }
        }
    }
}
