//! Picker presenter
//!
//! Owns the selection tree and drives it from host calls: candidate snapshots
//! in, clicks and keys in, draw passes and scroll ticks per frame, and
//! selection events out through a single sink.
//!
//! # Display modes
//!
//! - **Browsing**: rows are the visible nodes of the hierarchy, indented by
//!   depth, labelled with their short name.
//! - **Searching**: rows are the payload nodes matching the query, ranked by
//!   fuzzy score and labelled with their full name. Expand flags are left
//!   alone while searching.
//!
//! An empty query means Browsing.

use std::collections::HashMap;

use crossterm::event::KeyEvent;

use crate::candidate::Candidate;
use crate::config::PickerConfig;
use crate::input::fuzzy::rank_nodes;
use crate::input::navigation::NavAction;
use crate::view::focus::{FocusContext, PickerId};
use crate::view::geometry::Rect;
use crate::view::selection_tree::{
    ExpandStore, NodeId, SelectionState, SelectionTree, SelectorEvent, StoreError,
};
use crate::view::surface::{Fill, Icon, LabelStyle, Surface};
use crate::view::ui::scroll_planner::{ScrollPlanner, ScrollTick, ViewportRects};

/// Rows per page before the first tick reports a viewport
const DEFAULT_PAGE_ROWS: usize = 10;

/// Which list is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Browsing,
    Searching,
}

/// Receives selection events
pub type EventSink<P> = Box<dyn FnMut(SelectorEvent<P>)>;

/// Searchable, hierarchical picker over candidates carrying a payload `P`
pub struct SelectorPresenter<P> {
    id: PickerId,
    config: PickerConfig,
    tree: SelectionTree<P>,
    selection: SelectionState,
    planner: ScrollPlanner,
    mode: DisplayMode,
    query: String,
    search_results: Vec<NodeId>,
    /// Selection when the current search started
    selection_before_search: Option<NodeId>,
    /// Keyboard cursor row
    cursor: Option<NodeId>,
    /// Content rects recorded by the last layout
    node_rects: HashMap<NodeId, Rect>,
    page_rows: usize,
    ticked: bool,
    expand_store: Option<Box<dyn ExpandStore>>,
    on_event: EventSink<P>,
}

impl<P: Clone + PartialEq> SelectorPresenter<P> {
    /// Create an empty picker. Call [`Self::build`] to fill it.
    pub fn new<F>(id: PickerId, config: PickerConfig, on_event: F) -> Self
    where
        F: FnMut(SelectorEvent<P>) + 'static,
    {
        Self {
            id,
            selection: SelectionState::new(config.confirm_on_select),
            planner: ScrollPlanner::new(config.scroll_frame_budget),
            config,
            tree: SelectionTree::new(),
            mode: DisplayMode::Browsing,
            query: String::new(),
            search_results: Vec::new(),
            selection_before_search: None,
            cursor: None,
            node_rects: HashMap::new(),
            page_rows: DEFAULT_PAGE_ROWS,
            ticked: false,
            expand_store: None,
            on_event: Box::new(on_event),
        }
    }

    /// Attach storage for folder expand flags
    pub fn with_expand_store(mut self, store: Box<dyn ExpandStore>) -> Self {
        self.expand_store = Some(store);
        self
    }

    /// Persist buffered expand flags
    pub fn flush_expand_store(&mut self) -> Result<(), StoreError> {
        match self.expand_store.as_mut() {
            Some(store) => store.flush(),
            None => Ok(()),
        }
    }

    /// Replace the tree with a new candidate snapshot
    ///
    /// With `initially_selected`, the matching node becomes the selection
    /// without raising events, its folders are expanded and a scroll to it is
    /// requested.
    pub fn build<I>(&mut self, candidates: I, initially_selected: Option<&P>)
    where
        I: IntoIterator<Item = Candidate<P>>,
    {
        self.tree = SelectionTree::build(candidates);
        self.selection = SelectionState::new(self.config.confirm_on_select);
        self.planner = ScrollPlanner::new(self.config.scroll_frame_budget);
        self.mode = DisplayMode::Browsing;
        self.query.clear();
        self.search_results.clear();
        self.selection_before_search = None;
        self.cursor = None;
        self.node_rects.clear();

        if self.config.expand_all_on_open {
            self.tree.expand_all();
        } else {
            self.restore_expanded_states();
        }

        if let Some(payload) = initially_selected {
            match self.tree.find_by_payload(payload) {
                Some(node) => {
                    self.selection.restore(&self.tree, node);
                    self.reveal(node);
                    self.cursor = Some(node);
                    self.planner
                        .request(node, self.config.center_initial_selection);
                }
                None => tracing::warn!(picker = %self.id, "initial selection is not a candidate"),
            }
        }

        tracing::debug!(
            picker = %self.id,
            nodes = self.tree.node_count(),
            selected = ?self.selection.selected(),
            "picker built"
        );
    }

    /// Build from fully qualified type names, laid out by the configured grouping
    pub fn build_from_type_names<I, S>(&mut self, names: I, initially_selected: Option<&P>)
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        let grouping = self.config.grouping.clone();
        let candidates: Vec<Candidate<P>> = names
            .into_iter()
            .map(|(name, payload)| Candidate::from_type_name(name, &grouping, payload))
            .collect();
        self.build(candidates, initially_selected);
    }

    fn restore_expanded_states(&mut self) {
        if !self.config.use_cached_expanded_states {
            return;
        }
        let Some(store) = self.expand_store.as_ref() else {
            return;
        };
        let restored: Vec<(NodeId, bool)> = self
            .tree
            .folders()
            .filter_map(|id| store.load(&self.tree.full_path(id)).map(|flag| (id, flag)))
            .collect();
        for (id, expanded) in restored {
            self.tree.set_expanded(id, expanded);
        }
    }

    /// Record the expand flags of `ids` in the store
    fn persist(&mut self, ids: &[NodeId]) {
        if !self.config.use_cached_expanded_states {
            return;
        }
        if let Some(store) = self.expand_store.as_mut() {
            for &id in ids {
                store.store(&self.tree.full_path(id), self.tree.is_expanded(id));
            }
        }
    }

    fn reveal(&mut self, node: NodeId) {
        let changed = SelectionState::reveal_ancestors(&mut self.tree, node);
        self.persist(&changed);
    }

    fn dispatch(&mut self, events: Vec<SelectorEvent<P>>) {
        for event in events {
            (self.on_event)(event);
        }
    }

    /// Dispatch selection events, scrolling to a new selection if configured
    fn finish_selection(&mut self, events: Vec<SelectorEvent<P>>) {
        let changed = events
            .iter()
            .any(|event| matches!(event, SelectorEvent::SelectionChanged { .. }));
        if changed && self.config.auto_scroll_on_selection_changed {
            if let Some(selected) = self.selection.selected() {
                self.planner.request(selected, false);
            }
        }
        self.dispatch(events);
    }

    /// Update the search query
    pub fn set_query(&mut self, text: &str) {
        if self.is_empty() || text == self.query {
            return;
        }
        self.query = text.to_string();
        self.node_rects.clear();

        if text.is_empty() {
            self.exit_search();
            return;
        }

        if self.mode == DisplayMode::Browsing {
            self.mode = DisplayMode::Searching;
            self.selection_before_search = self.selection.selected();
            self.planner.cancel();
            self.planner.to_top();
            tracing::debug!(picker = %self.id, "entered search");
        }

        let candidates = self.tree.payload_nodes();
        self.search_results = rank_nodes(text, &self.tree, &candidates);
        self.cursor = self
            .selection
            .selected()
            .filter(|selected| self.search_results.contains(selected))
            .or_else(|| self.search_results.first().copied());
        tracing::trace!(query = text, results = self.search_results.len(), "search updated");
    }

    fn exit_search(&mut self) {
        self.mode = DisplayMode::Browsing;
        self.search_results.clear();
        let selected = self.selection.selected();
        self.cursor = selected;

        if let Some(node) = selected {
            // Only a selection made while searching may need its folders opened
            if Some(node) != self.selection_before_search {
                self.reveal(node);
            }
            self.planner.request(node, false);
        }
        self.selection_before_search = None;
        tracing::debug!(picker = %self.id, "left search");
    }

    /// Select `payload` as if the user picked it, revealing its node
    pub fn select_payload(&mut self, payload: &P) -> bool {
        let Some(node) = self.tree.find_by_payload(payload) else {
            return false;
        };
        if self.mode == DisplayMode::Browsing {
            self.reveal(node);
        }
        self.cursor = Some(node);
        let events = self.selection.select_payload_node(&mut self.tree, node);
        self.finish_selection(events);
        true
    }

    /// Empty the selection
    pub fn clear_selection(&mut self) {
        let events = self.selection.clear();
        self.dispatch(events);
    }

    fn is_live(&self, node: NodeId) -> bool {
        if self.is_empty() {
            return false;
        }
        if node == NodeId::ROOT || !self.tree.contains(node) {
            tracing::warn!(picker = %self.id, node = %node, "ignoring input for unknown node");
            return false;
        }
        // Only listed rows take input while searching; folders are never listed
        if self.mode == DisplayMode::Searching && !self.search_results.contains(&node) {
            tracing::warn!(
                picker = %self.id,
                node = %node,
                "ignoring input for node outside search results"
            );
            return false;
        }
        true
    }

    /// Select or toggle `node` per the current mode
    fn activate(&mut self, node: NodeId) {
        let events = match self.mode {
            DisplayMode::Browsing => {
                let was_folder = self.tree.get_node(node).is_some_and(|n| n.is_folder());
                let events = self.selection.select(&mut self.tree, node);
                if was_folder {
                    self.persist(&[node]);
                }
                events
            }
            DisplayMode::Searching => self.selection.select_payload_node(&mut self.tree, node),
        };
        self.finish_selection(events);
    }

    /// Single click on a row
    pub fn handle_click(&mut self, node: NodeId, focus: &mut FocusContext) {
        if !self.is_live(node) {
            return;
        }
        focus.focus(self.id);
        self.cursor = Some(node);
        tracing::trace!(picker = %self.id, node = %node, "click");
        self.activate(node);
    }

    /// Alt-click: toggle a folder together with every folder below it
    pub fn handle_alt_click(&mut self, node: NodeId, focus: &mut FocusContext) {
        let is_folder = self.tree.get_node(node).is_some_and(|n| n.is_folder());
        if self.mode == DisplayMode::Searching || !is_folder {
            self.handle_click(node, focus);
            return;
        }
        if !self.is_live(node) {
            return;
        }
        focus.focus(self.id);
        self.cursor = Some(node);

        let expanded = !self.tree.is_expanded(node);
        self.tree.set_expanded_recursive(node, expanded);
        let subtree: Vec<NodeId> = self
            .tree
            .enumerate_depth_first(node, true)
            .filter(|&id| self.tree.get_node(id).is_some_and(|n| n.is_folder()))
            .collect();
        self.persist(&subtree);
        tracing::trace!(picker = %self.id, node = %node, expanded, "toggled subtree");
    }

    /// Double click on a row: selects and confirms payload nodes
    pub fn handle_double_click(&mut self, node: NodeId, focus: &mut FocusContext) {
        let has_payload = self.tree.get_node(node).is_some_and(|n| n.has_payload());
        if !has_payload || !self.is_live(node) {
            return;
        }
        focus.focus(self.id);
        self.cursor = Some(node);

        if self.selection.selected() != Some(node) {
            let events = self.selection.select_payload_node(&mut self.tree, node);
            let confirmed = events
                .iter()
                .any(|event| matches!(event, SelectorEvent::SelectionConfirmed(_)));
            self.finish_selection(events);
            if confirmed {
                return;
            }
        }

        if self.config.confirm_on_double_click {
            let events = self.selection.confirm(&self.tree);
            self.dispatch(events);
        }
    }

    /// Handle a navigation key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, focus: &FocusContext) -> bool {
        if self.is_empty()
            || !self.config.auto_handle_keyboard_navigation
            || !focus.is_focused(self.id)
        {
            return false;
        }
        let Some(action) = NavAction::from_key(key) else {
            return false;
        };

        let rows: Vec<NodeId> = self.rows().into_iter().map(|(id, _)| id).collect();
        if rows.is_empty() {
            return false;
        }
        let current = self
            .cursor
            .or(self.selection.selected())
            .and_then(|node| rows.iter().position(|&id| id == node));
        let last = rows.len() - 1;

        let target = match (action, current) {
            (NavAction::Home, _) => Some(0),
            (NavAction::End, _) => Some(last),
            (NavAction::Up, Some(pos)) => Some(pos.saturating_sub(1)),
            (NavAction::Down, Some(pos)) => Some((pos + 1).min(last)),
            (NavAction::PageUp, Some(pos)) => Some(pos.saturating_sub(self.page_rows.max(1))),
            (NavAction::PageDown, Some(pos)) => {
                Some(pos.saturating_add(self.page_rows.max(1)).min(last))
            }
            (NavAction::Up | NavAction::Down | NavAction::PageUp | NavAction::PageDown, None) => {
                Some(0)
            }
            (NavAction::Left, Some(pos)) => {
                self.collapse_or_parent(rows[pos]);
                None
            }
            (NavAction::Right, Some(pos)) => {
                self.expand_or_child(rows[pos]);
                None
            }
            (NavAction::Enter, Some(pos)) => {
                self.enter(rows[pos]);
                None
            }
            (NavAction::Left | NavAction::Right | NavAction::Enter, None) => None,
        };

        if let Some(index) = target {
            self.move_cursor(rows[index]);
        }
        true
    }

    fn move_cursor(&mut self, node: NodeId) {
        self.cursor = Some(node);
        self.planner.request(node, false);
    }

    fn collapse_or_parent(&mut self, node: NodeId) {
        if self.mode == DisplayMode::Searching {
            return;
        }
        if self.tree.is_expanded(node) {
            self.tree.set_expanded(node, false);
            self.persist(&[node]);
            return;
        }
        let parent = self.tree.get_node(node).and_then(|n| n.parent);
        if let Some(parent) = parent.filter(|&parent| parent != NodeId::ROOT) {
            self.move_cursor(parent);
        }
    }

    fn expand_or_child(&mut self, node: NodeId) {
        if self.mode == DisplayMode::Searching {
            return;
        }
        let Some(first_child) = self
            .tree
            .get_node(node)
            .and_then(|n| n.children.first().copied())
        else {
            return;
        };
        if self.tree.is_expanded(node) {
            self.move_cursor(first_child);
        } else {
            self.tree.set_expanded(node, true);
            self.persist(&[node]);
        }
    }

    fn enter(&mut self, node: NodeId) {
        self.activate(node);
        if !self.config.confirm_on_select && self.selection.selected() == Some(node) {
            let events = self.selection.confirm(&self.tree);
            self.dispatch(events);
        }
    }

    /// Advance pending scroll work by one frame
    pub fn tick(&mut self, viewport: ViewportRects, focus: &mut FocusContext) -> ScrollTick {
        if !self.ticked {
            self.ticked = true;
            if focus.owner().is_none() {
                focus.focus(self.id);
            }
        }
        let row_height = self.config.row_height;
        if viewport.outer.height > 0.0 && row_height.is_finite() && row_height > 0.0 {
            self.page_rows = ((viewport.outer.height / row_height) as usize).max(1);
        }

        let rect = self
            .planner
            .pending()
            .and_then(|request| self.node_rects.get(&request.target).copied());
        self.planner.tick(rect, &viewport)
    }

    /// Lay rows out, record their rects and paint the visible ones
    pub fn draw(&mut self, surface: &mut dyn Surface, viewport: ViewportRects) {
        self.node_rects.clear();

        if self.is_empty() {
            surface.draw_label(
                viewport.outer,
                &self.config.empty_message,
                LabelStyle::Placeholder,
            );
            return;
        }

        self.planner.set_offset(self.planner.offset(), &viewport);
        let searching = self.mode == DisplayMode::Searching;
        let row_height = self.config.row_height;
        let (window_top, window_bottom) = self.planner.visible_window(&viewport);
        let window = Rect::new(
            viewport.inner.x,
            window_top,
            viewport.inner.width,
            window_bottom - window_top,
        );
        let dx = viewport.outer.x - viewport.inner.x;
        let dy = viewport.outer.y - window_top;

        for (index, (id, depth)) in self.rows().into_iter().enumerate() {
            let content = Rect::new(
                viewport.inner.x,
                viewport.inner.y + index as f32 * row_height,
                viewport.inner.width,
                row_height,
            );
            self.node_rects.insert(id, content);
            if !window.intersects_vertically(&content) {
                continue;
            }
            let Some(node) = self.tree.get_node(id) else {
                continue;
            };

            let screen = content.translated(dx, dy);
            let selected = self.selection.selected() == Some(id);
            if selected {
                surface.draw_rect(screen, Fill::Selected);
            } else if self.cursor == Some(id) {
                surface.draw_rect(screen, Fill::Cursor);
            }

            let label_rect = if searching {
                screen
            } else {
                let body = screen.inset_left(depth as f32 * self.config.indent_width);
                let (icon_rect, label_rect) = body.split_left(self.config.indent_width);
                if node.is_folder() {
                    let icon = if node.is_expanded() {
                        Icon::Expanded
                    } else {
                        Icon::Collapsed
                    };
                    surface.draw_icon(icon_rect, icon);
                }
                label_rect
            };

            let style = if selected {
                LabelStyle::Selected
            } else if node.is_folder() && !searching {
                LabelStyle::Folder
            } else {
                LabelStyle::Item
            };
            surface.draw_label(label_rect, node.label(searching), style);
        }

        if self.planner.pending().is_some() {
            surface.request_redraw();
        }
    }

    /// Record a row rect laid out by the host instead of [`Self::draw`]
    pub fn record_node_rect(&mut self, node: NodeId, rect: Rect) {
        self.node_rects.insert(node, rect);
    }

    /// Row under a screen point, from the last layout
    pub fn node_at(&self, x: f32, y: f32, viewport: &ViewportRects) -> Option<NodeId> {
        if !viewport.outer.contains(x, y) {
            return None;
        }
        let (window_top, _) = self.planner.visible_window(viewport);
        let content_x = x - viewport.outer.x + viewport.inner.x;
        let content_y = y - viewport.outer.y + window_top;
        self.node_rects
            .iter()
            .find(|(_, rect)| rect.contains(content_x, content_y))
            .map(|(&id, _)| id)
    }

    /// Width needed to show every row without clipping in either mode
    pub fn optimal_width(&self, surface: &dyn Surface) -> f32 {
        if self.is_empty() {
            return surface.measure_text(&self.config.empty_message).width;
        }
        self.tree
            .enumerate_depth_first(NodeId::ROOT, false)
            .filter_map(|id| self.tree.get_node(id).map(|node| (id, node)))
            .map(|(id, node)| {
                let indent = (self.tree.depth(id) + 1) as f32 * self.config.indent_width;
                let browse = indent + surface.measure_text(&node.name).width;
                let search = surface.measure_text(node.label(true)).width;
                browse.max(search)
            })
            .fold(0.0, f32::max)
    }

    /// Height of all rows in the current mode
    pub fn content_height(&self) -> f32 {
        self.rows().len() as f32 * self.config.row_height
    }

    /// Rows of the current mode as (node, depth)
    pub fn rows(&self) -> Vec<(NodeId, usize)> {
        match self.mode {
            DisplayMode::Browsing => self.tree.visible_rows(),
            DisplayMode::Searching => self.search_results.iter().map(|&id| (id, 0)).collect(),
        }
    }

    /// Whether `node` is shown in the current list
    pub fn is_visible(&self, node: NodeId) -> bool {
        let results = match self.mode {
            DisplayMode::Browsing => None,
            DisplayMode::Searching => Some(self.search_results.as_slice()),
        };
        SelectionState::is_visible(&self.tree, node, results)
    }

    pub fn id(&self) -> PickerId {
        self.id
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn tree(&self) -> &SelectionTree<P> {
        &self.tree
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection.selected()
    }

    pub fn selected_payload(&self) -> Option<&P> {
        self.selection.selected_payload(&self.tree)
    }

    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    pub fn search_results(&self) -> &[NodeId] {
        &self.search_results
    }

    pub fn planner(&self) -> &ScrollPlanner {
        &self.planner
    }

    pub fn node_rect(&self, node: NodeId) -> Option<Rect> {
        self.node_rects.get(&node).copied()
    }

    /// True when there are no candidates
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
