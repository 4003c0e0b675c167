//! [`Surface`] over a ratatui buffer
//!
//! One surface unit is one terminal cell. Fractional coordinates are floored
//! and everything is clipped to the buffer area.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color, Style};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::geometry::{Rect, Size};
use super::surface::{Fill, Icon, LabelStyle, Surface};

/// Colors used by [`RatatuiSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTheme {
    pub selected_bg: Color,
    pub cursor_bg: Color,
    pub item_fg: Color,
    pub folder_fg: Color,
    pub selected_fg: Color,
    pub placeholder_fg: Color,
    pub icon_fg: Color,
}

impl Default for SurfaceTheme {
    fn default() -> Self {
        Self {
            selected_bg: Color::Blue,
            cursor_bg: Color::DarkGray,
            item_fg: Color::Reset,
            folder_fg: Color::Yellow,
            selected_fg: Color::White,
            placeholder_fg: Color::Gray,
            icon_fg: Color::Gray,
        }
    }
}

/// Draws into a ratatui [`Buffer`]
pub struct RatatuiSurface<'a> {
    buf: &'a mut Buffer,
    theme: SurfaceTheme,
    redraw_requested: bool,
}

impl<'a> RatatuiSurface<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self::with_theme(buf, SurfaceTheme::default())
    }

    pub fn with_theme(buf: &'a mut Buffer, theme: SurfaceTheme) -> Self {
        Self {
            buf,
            theme,
            redraw_requested: false,
        }
    }

    /// Whether something asked for another frame since creation
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    /// Convert a surface rect to cells, clipped to the buffer
    fn to_cells(&self, rect: Rect) -> Option<CellRect> {
        let area = self.buf.area;
        let left = rect.x.floor().max(area.left() as f32);
        let top = rect.y.floor().max(area.top() as f32);
        let right = rect.right().ceil().min(area.right() as f32);
        let bottom = rect.bottom().ceil().min(area.bottom() as f32);
        if right <= left || bottom <= top {
            return None;
        }
        Some(CellRect::new(
            left as u16,
            top as u16,
            (right - left) as u16,
            (bottom - top) as u16,
        ))
    }

    fn label_style(&self, style: LabelStyle) -> Style {
        let fg = match style {
            LabelStyle::Item => self.theme.item_fg,
            LabelStyle::Folder => self.theme.folder_fg,
            LabelStyle::Selected => self.theme.selected_fg,
            LabelStyle::Placeholder => self.theme.placeholder_fg,
        };
        Style::default().fg(fg)
    }
}

impl Surface for RatatuiSurface<'_> {
    fn measure_text(&self, text: &str) -> Size {
        Size::new(text.width() as f32, 1.0)
    }

    fn draw_rect(&mut self, rect: Rect, fill: Fill) {
        let Some(cells) = self.to_cells(rect) else {
            return;
        };
        let bg = match fill {
            Fill::Selected => self.theme.selected_bg,
            Fill::Cursor => self.theme.cursor_bg,
        };
        self.buf.set_style(cells, Style::default().bg(bg));
    }

    fn draw_label(&mut self, rect: Rect, text: &str, style: LabelStyle) {
        let Some(cells) = self.to_cells(rect) else {
            return;
        };
        // Truncate by display width so wide chars never spill past the rect
        let max_width = cells.width as usize;
        let mut used = 0;
        let clipped: String = text
            .chars()
            .take_while(|c| {
                used += c.width().unwrap_or(0);
                used <= max_width
            })
            .collect();
        let style = self.label_style(style);
        self.buf.set_string(cells.x, cells.y, clipped, style);
    }

    fn draw_icon(&mut self, rect: Rect, icon: Icon) {
        let Some(cells) = self.to_cells(rect) else {
            return;
        };
        let symbol = match icon {
            Icon::Collapsed => "▸",
            Icon::Expanded => "▾",
        };
        self.buf
            .set_string(cells.x, cells.y, symbol, Style::default().fg(self.theme.icon_fg));
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}
