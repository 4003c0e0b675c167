//! Scroll-to-node that survives layout settling
//!
//! A node's rect is only known after the host has laid it out, and the
//! viewport itself may take a few frames to reach its final size. A scroll
//! request is therefore kept pending across ticks:
//!
//! 1. **Request** - `request(target, center)` records the node to reveal.
//! 2. **Tick** - each frame, `tick(node_rect, viewport)` either waits for a
//!    usable rect, moves the offset so the node is inside the visible window,
//!    or clears the request once the node is fully visible.
//! 3. **Budget** - a request still unresolved after `frame_budget` ticks is
//!    dropped.
//!
//! Node rects and the `inner` (content) rect are in content coordinates; the
//! `outer` (visible) rect is in screen coordinates. Only its height matters.

use crate::view::geometry::Rect;
use crate::view::selection_tree::NodeId;

/// Ticks a request may stay pending before it is dropped
pub const DEFAULT_SCROLL_FRAME_BUDGET: u32 = 6;

/// Offsets closer than this count as unchanged
const OFFSET_EPSILON: f32 = 0.001;

/// Pending request to bring a node into view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub target: NodeId,
    /// Center the node instead of aligning the nearest edge
    pub center: bool,
    /// Ticks spent on this request so far
    pub ticks: u32,
}

/// Viewport geometry for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRects {
    /// Visible area
    pub outer: Rect,
    /// Full scrollable content
    pub inner: Rect,
}

impl ViewportRects {
    pub fn new(outer: Rect, inner: Rect) -> Self {
        Self { outer, inner }
    }

    /// Largest valid scroll offset
    pub fn max_offset(&self) -> f32 {
        (self.inner.height - self.outer.height).max(0.0)
    }
}

/// Outcome of a single [`ScrollPlanner::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollTick {
    /// Nothing pending
    Idle,
    /// Rect or viewport not usable yet; request kept
    Waiting,
    /// Offset moved by `delta`; request kept until the node is seen in view
    Scrolled { delta: f32 },
    /// Node fully visible; request cleared
    Settled,
    /// Budget exhausted; request dropped
    Abandoned,
}

/// Vertical scroll offset plus at most one pending scroll request
#[derive(Debug, Clone)]
pub struct ScrollPlanner {
    offset: f32,
    pending: Option<ScrollRequest>,
    frame_budget: u32,
}

impl Default for ScrollPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_FRAME_BUDGET)
    }
}

impl ScrollPlanner {
    pub fn new(frame_budget: u32) -> Self {
        Self {
            offset: 0.0,
            pending: None,
            frame_budget: frame_budget.max(1),
        }
    }

    /// Current scroll offset
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Set the offset directly (e.g. from a scrollbar drag)
    pub fn set_offset(&mut self, offset: f32, viewport: &ViewportRects) {
        self.offset = offset.clamp(0.0, viewport.max_offset());
    }

    /// Scroll by `delta`, positive scrolling down
    pub fn scroll_by(&mut self, delta: f32, viewport: &ViewportRects) {
        self.set_offset(self.offset + delta, viewport);
    }

    /// Jump to the top
    pub fn to_top(&mut self) {
        self.offset = 0.0;
    }

    /// Pending request, if any
    pub fn pending(&self) -> Option<&ScrollRequest> {
        self.pending.as_ref()
    }

    /// Ask for `target` to be brought into view. Replaces any pending request.
    pub fn request(&mut self, target: NodeId, center: bool) {
        self.pending = Some(ScrollRequest {
            target,
            center,
            ticks: 0,
        });
    }

    /// Drop the pending request
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Visible window in content coordinates as (top, bottom)
    pub fn visible_window(&self, viewport: &ViewportRects) -> (f32, f32) {
        let top = viewport.inner.y + self.offset;
        (top, top + viewport.outer.height)
    }

    /// Advance the pending request by one frame
    ///
    /// `node_rect` is the target's last laid-out rect, or `None` if it has
    /// not been drawn.
    pub fn tick(&mut self, node_rect: Option<Rect>, viewport: &ViewportRects) -> ScrollTick {
        let Some(request) = self.pending.as_mut() else {
            return ScrollTick::Idle;
        };
        request.ticks += 1;
        let request = *request;

        let rect = node_rect.filter(|rect| rect.is_settled());
        let outcome = match rect {
            Some(rect) if viewport.outer.is_settled() => self.scroll_towards(rect, request, viewport),
            _ => ScrollTick::Waiting,
        };

        match outcome {
            ScrollTick::Settled => {
                self.pending = None;
                outcome
            }
            _ if request.ticks >= self.frame_budget => {
                self.pending = None;
                tracing::debug!(
                    target_node = %request.target,
                    ticks = request.ticks,
                    "scroll request did not settle, dropping it"
                );
                match outcome {
                    ScrollTick::Scrolled { .. } => outcome,
                    _ => ScrollTick::Abandoned,
                }
            }
            _ => outcome,
        }
    }

    fn scroll_towards(
        &mut self,
        rect: Rect,
        request: ScrollRequest,
        viewport: &ViewportRects,
    ) -> ScrollTick {
        let (top, bottom) = self.visible_window(viewport);
        if rect.top() >= top && rect.bottom() <= bottom {
            return ScrollTick::Settled;
        }

        let window = viewport.outer.height;
        let origin = viewport.inner.y;
        let desired = if request.center {
            rect.top() + rect.height / 2.0 - window / 2.0 - origin
        } else if rect.top() < top || rect.height > window {
            // Above the window, or too tall to fit: align the top edge
            rect.top() - origin
        } else {
            rect.bottom() - window - origin
        };

        let new_offset = desired.clamp(0.0, viewport.max_offset());
        let delta = new_offset - self.offset;
        if delta.abs() < OFFSET_EPSILON {
            // Clamped against an edge; the node cannot get any closer
            return ScrollTick::Waiting;
        }

        self.offset = new_offset;
        tracing::trace!(target_node = %request.target, delta, "scrolled towards node");
        ScrollTick::Scrolled { delta }
    }
}
