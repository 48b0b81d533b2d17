use oxiblast_engine::Cell;
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::Widget,
};

use crate::ui::widgets::style;

/// One board or tray cell, two terminal columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const EMPTY: Self = Self::new(style::EMPTY, "");
    pub const EMPTY_DOT: Self = Self::new(style::EMPTY_DOT, ". ");
    pub const HINT: Self = Self::new(style::HINT, "++");
    pub const PREVIEW: Self = Self::new(style::PREVIEW, "[]");
    pub const PREVIEW_BLOCKED: Self = Self::new(style::PREVIEW_BLOCKED, "[]");

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell {
            Cell::Empty if show_dots => Self::EMPTY_DOT,
            Cell::Empty => Self::EMPTY,
            Cell::Filled(color) => Self::new(style::shape(color), ""),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        if area.is_empty() {
            return;
        }
        // Fill the whole area, not just the cells under the symbol.
        buf.set_style(area, self.style);
        buf.set_stringn(
            area.x,
            area.y,
            self.symbol,
            usize::from(area.width),
            self.style,
        );
    }
}
