//! Rendering capability consumed by the picker.
//!
//! The presenter never talks to a concrete renderer. It lays rows out in
//! surface units and asks a [`Surface`] to paint them.

use super::geometry::{Rect, Size};

/// Background fill roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Row holding the selection
    Selected,
    /// Row under the keyboard cursor
    Cursor,
}

/// Text roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Item,
    Folder,
    Selected,
    /// Empty-state message
    Placeholder,
}

/// Icons drawn in front of folder rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Collapsed,
    Expanded,
}

/// Renderer used by the draw pass
///
/// All rects are in screen coordinates.
pub trait Surface {
    /// Size `text` would take when drawn as a label
    fn measure_text(&self, text: &str) -> Size;

    fn draw_rect(&mut self, rect: Rect, fill: Fill);

    /// Draw `text` inside `rect`, clipped to it
    fn draw_label(&mut self, rect: Rect, text: &str, style: LabelStyle);

    fn draw_icon(&mut self, rect: Rect, icon: Icon);

    /// Ask the host for another frame
    fn request_redraw(&mut self);
}
