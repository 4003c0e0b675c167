//! Geometry in surface units.
//!
//! A surface unit is whatever the host draws in: pixels for a GUI host, cells
//! for a terminal host. Node rects live in content coordinates (the coordinate
//! space of the scrollable content), viewport rects in screen coordinates.

/// Rects with a height at or below this are treated as "not laid out yet".
pub const MIN_SETTLED_HEIGHT: f32 = 0.01;

/// Width and height pair returned by text measurement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Whether this rect has a usable, measured height
    pub fn is_settled(&self) -> bool {
        self.height > MIN_SETTLED_HEIGHT
    }

    /// Check whether a point lies inside the rect (edges inclusive on top/left)
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check whether the vertical extent of `other` overlaps this rect
    pub fn intersects_vertically(&self, other: &Rect) -> bool {
        other.bottom() > self.top() && other.top() < self.bottom()
    }

    /// Same rect moved by `dx`, `dy`
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Shrink from the left by `amount`, never below zero width
    pub fn inset_left(&self, amount: f32) -> Rect {
        let amount = amount.clamp(0.0, self.width);
        Rect::new(self.x + amount, self.y, self.width - amount, self.height)
    }

    /// Split off a left column of `width`, returning (column, rest)
    pub fn split_left(&self, width: f32) -> (Rect, Rect) {
        let width = width.clamp(0.0, self.width);
        (
            Rect::new(self.x, self.y, width, self.height),
            Rect::new(self.x + width, self.y, self.width - width, self.height),
        )
    }
}
