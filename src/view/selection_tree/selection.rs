use super::node::NodeId;
use super::tree::SelectionTree;

/// Kind of change reported with [`SelectorEvent::SelectionChanged`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChangeKind {
    /// A node became the selection
    ItemAdded,
    /// The selection was emptied
    SelectionCleared,
}

/// Events raised by selection changes
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorEvent<P> {
    SelectionChanged {
        node: Option<NodeId>,
        change: SelectionChangeKind,
    },
    SelectionConfirmed(P),
}

/// Current selection plus the rules for changing it
///
/// Mutations return the events they raise instead of dispatching them; the
/// presenter forwards them to its sink.
#[derive(Debug, Clone)]
pub struct SelectionState {
    selected: Option<NodeId>,
    confirm_on_select: bool,
}

impl SelectionState {
    pub fn new(confirm_on_select: bool) -> Self {
        Self {
            selected: None,
            confirm_on_select,
        }
    }

    /// Currently selected node
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Payload of the current selection
    pub fn selected_payload<'a, P>(&self, tree: &'a SelectionTree<P>) -> Option<&'a P> {
        self.selected
            .and_then(|id| tree.get_node(id))
            .and_then(|node| node.payload.as_ref())
    }

    /// Select `id` following browse-mode rules
    ///
    /// Folders toggle their expand flag and leave the selection alone. Leaves
    /// become the selection.
    pub fn select<P: Clone>(
        &mut self,
        tree: &mut SelectionTree<P>,
        id: NodeId,
    ) -> Vec<SelectorEvent<P>> {
        let Some(node) = selectable(tree, id) else {
            return Vec::new();
        };

        if node.is_folder() {
            let expanded = !node.is_expanded();
            tree.set_expanded(id, expanded);
            tracing::trace!(node = %id, expanded, "toggled folder");
            return Vec::new();
        }

        self.select_unchecked(tree, id)
    }

    /// Select a payload-carrying node even when it also has children
    ///
    /// Search results are flat, so a merged node is picked directly instead of
    /// toggling. Nodes without a payload fall back to [`Self::select`].
    pub fn select_payload_node<P: Clone>(
        &mut self,
        tree: &mut SelectionTree<P>,
        id: NodeId,
    ) -> Vec<SelectorEvent<P>> {
        let Some(has_payload) = selectable(tree, id).map(|node| node.has_payload()) else {
            return Vec::new();
        };
        if has_payload {
            self.select_unchecked(tree, id)
        } else {
            self.select(tree, id)
        }
    }

    fn select_unchecked<P: Clone>(
        &mut self,
        tree: &SelectionTree<P>,
        id: NodeId,
    ) -> Vec<SelectorEvent<P>> {
        self.selected = Some(id);
        tracing::debug!(node = %id, "selection changed");

        let mut events = vec![SelectorEvent::SelectionChanged {
            node: Some(id),
            change: SelectionChangeKind::ItemAdded,
        }];
        if self.confirm_on_select {
            if let Some(payload) = self.selected_payload(tree) {
                events.push(SelectorEvent::SelectionConfirmed(payload.clone()));
            }
        }
        events
    }

    /// Set the selection without raising events
    pub fn restore<P>(&mut self, tree: &SelectionTree<P>, id: NodeId) -> bool {
        if !tree.contains(id) || id == NodeId::ROOT {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Empty the selection
    pub fn clear<P>(&mut self) -> Vec<SelectorEvent<P>> {
        if self.selected.take().is_none() {
            return Vec::new();
        }
        vec![SelectorEvent::SelectionChanged {
            node: None,
            change: SelectionChangeKind::SelectionCleared,
        }]
    }

    /// Confirm the current selection
    pub fn confirm<P: Clone>(&self, tree: &SelectionTree<P>) -> Vec<SelectorEvent<P>> {
        self.selected_payload(tree)
            .map(|payload| vec![SelectorEvent::SelectionConfirmed(payload.clone())])
            .unwrap_or_default()
    }

    /// Expand every folder above `id`, root excluded
    ///
    /// Returns the folders whose flag actually changed.
    pub fn reveal_ancestors<P>(tree: &mut SelectionTree<P>, id: NodeId) -> Vec<NodeId> {
        let ancestors: Vec<NodeId> = tree.ancestors(id).collect();
        let mut changed = Vec::new();
        for ancestor in ancestors {
            if !tree.is_expanded(ancestor) {
                tree.set_expanded(ancestor, true);
                changed.push(ancestor);
            }
        }
        changed
    }

    /// Whether `id` is shown in the current list
    ///
    /// With search results, membership decides. Otherwise every folder above
    /// the node has to be expanded.
    pub fn is_visible<P>(
        tree: &SelectionTree<P>,
        id: NodeId,
        search_results: Option<&[NodeId]>,
    ) -> bool {
        if !tree.contains(id) || id == NodeId::ROOT {
            return false;
        }
        match search_results {
            Some(results) => results.contains(&id),
            None => tree.ancestors(id).all(|ancestor| tree.is_expanded(ancestor)),
        }
    }
}

fn selectable<P>(tree: &SelectionTree<P>, id: NodeId) -> Option<&super::node::SelectionNode<P>> {
    if id == NodeId::ROOT || !tree.contains(id) {
        tracing::warn!(node = %id, "ignoring selection of unknown node");
        return None;
    }
    tree.get_node(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use proptest::prelude::*;

    fn game_tree() -> SelectionTree<&'static str> {
        SelectionTree::build(
            [
                ("Game/Enemy/Goblin", "Goblin"),
                ("Game/Enemy/Orc", "Orc"),
                ("Game/Player", "Player"),
            ]
            .into_iter()
            .map(|(path, payload)| Candidate::new(path, path.replace('/', "."), payload)),
        )
    }

    #[test]
    fn test_select_leaf_raises_events() {
        let mut tree = game_tree();
        let orc = tree.find_by_path("Game/Enemy/Orc").unwrap();
        let mut state = SelectionState::new(true);

        let events = state.select(&mut tree, orc);
        assert_eq!(
            events,
            vec![
                SelectorEvent::SelectionChanged {
                    node: Some(orc),
                    change: SelectionChangeKind::ItemAdded,
                },
                SelectorEvent::SelectionConfirmed("Orc"),
            ]
        );
        assert_eq!(state.selected(), Some(orc));
        assert_eq!(state.selected_payload(&tree), Some(&"Orc"));
    }

    #[test]
    fn test_select_without_confirm_on_select() {
        let mut tree = game_tree();
        let player = tree.find_by_path("Game/Player").unwrap();
        let mut state = SelectionState::new(false);

        let events = state.select(&mut tree, player);
        assert_eq!(events.len(), 1);
        assert_eq!(state.confirm(&tree), vec![SelectorEvent::SelectionConfirmed("Player")]);
    }

    #[test]
    fn test_select_folder_toggles() {
        let mut tree = game_tree();
        let game = tree.find_by_path("Game").unwrap();
        let mut state = SelectionState::new(true);

        assert!(state.select(&mut tree, game).is_empty());
        assert!(tree.is_expanded(game));
        assert_eq!(state.selected(), None);

        assert!(state.select(&mut tree, game).is_empty());
        assert!(!tree.is_expanded(game));
    }

    #[test]
    fn test_select_stale_or_root_is_noop() {
        let mut tree = game_tree();
        let mut state = SelectionState::new(true);
        assert!(state.select(&mut tree, NodeId(500)).is_empty());
        assert!(state.select(&mut tree, NodeId::ROOT).is_empty());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_select_payload_node_picks_merged_folder() {
        let mut tree: SelectionTree<u32> = SelectionTree::build([
            Candidate::new("A/B/C", "A.B.C", 1),
            Candidate::new("A/B", "A.B", 2),
        ]);
        let b = tree.find_by_path("A/B").unwrap();
        let mut state = SelectionState::new(false);

        // Browse rules toggle it
        assert!(state.select(&mut tree, b).is_empty());
        assert!(tree.is_expanded(b));

        let events = state.select_payload_node(&mut tree, b);
        assert_eq!(events.len(), 1);
        assert_eq!(state.selected(), Some(b));
        // Expand flag untouched
        assert!(tree.is_expanded(b));
    }

    #[test]
    fn test_clear() {
        let mut tree = game_tree();
        let orc = tree.find_by_path("Game/Enemy/Orc").unwrap();
        let mut state = SelectionState::new(false);
        assert!(state.clear::<&str>().is_empty());

        state.select(&mut tree, orc);
        assert_eq!(
            state.clear::<&str>(),
            vec![SelectorEvent::SelectionChanged {
                node: None,
                change: SelectionChangeKind::SelectionCleared,
            }]
        );
        assert_eq!(state.selected(), None);
        assert!(state.confirm(&tree).is_empty());
    }

    #[test]
    fn test_restore_is_silent() {
        let tree = game_tree();
        let orc = tree.find_by_path("Game/Enemy/Orc").unwrap();
        let mut state = SelectionState::new(true);
        assert!(state.restore(&tree, orc));
        assert_eq!(state.selected(), Some(orc));
        assert!(!state.restore(&tree, NodeId::ROOT));
    }

    #[test]
    fn test_reveal_and_visibility() {
        let mut tree = game_tree();
        let orc = tree.find_by_path("Game/Enemy/Orc").unwrap();
        let game = tree.find_by_path("Game").unwrap();
        let enemy = tree.find_by_path("Game/Enemy").unwrap();

        assert!(!SelectionState::is_visible(&tree, orc, None));
        assert!(SelectionState::is_visible(&tree, game, None));

        let changed = SelectionState::reveal_ancestors(&mut tree, orc);
        assert_eq!(changed, vec![enemy, game]);
        assert!(SelectionState::is_visible(&tree, orc, None));
        assert!(SelectionState::reveal_ancestors(&mut tree, orc).is_empty());

        assert!(SelectionState::is_visible(&tree, orc, Some(&[orc])));
        assert!(!SelectionState::is_visible(&tree, game, Some(&[orc])));
    }

    proptest! {
        #[test]
        fn prop_reveal_expands_every_ancestor(
            paths in proptest::collection::vec("[abc](/[abc]){0,4}", 1..24),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut tree: SelectionTree<usize> = SelectionTree::build(
                paths.iter().enumerate().map(|(i, p)| Candidate::new(p.as_str(), p.as_str(), i)),
            );
            let nodes: Vec<NodeId> = tree.enumerate_depth_first(NodeId::ROOT, false).collect();
            let target = nodes[pick.index(nodes.len())];

            SelectionState::reveal_ancestors(&mut tree, target);

            for ancestor in tree.ancestors(target).collect::<Vec<_>>() {
                prop_assert!(tree.is_expanded(ancestor));
            }
            prop_assert!(SelectionState::is_visible(&tree, target, None));
            prop_assert!(tree.visible_rows().iter().any(|&(id, _)| id == target));
        }
    }
}
