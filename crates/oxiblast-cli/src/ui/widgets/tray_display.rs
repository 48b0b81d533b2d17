use std::iter;

use oxiblast_engine::{MAX_SHAPE_SIZE, Shape, TRAY_CAPACITY, Tray};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block as BlockWidget, Widget},
};

use crate::ui::widgets::{CellDisplay, color, style};

/// The tray as numbered slot panels, left to right.
#[derive(Debug)]
pub struct TrayDisplay<'a> {
    tray: &'a Tray,
    selected: Option<usize>,
    border_color: Color,
}

const SLOT_SPACING: u16 = 1;

impl<'a> TrayDisplay<'a> {
    pub fn new(tray: &'a Tray) -> Self {
        Self {
            tray,
            selected: None,
            border_color: color::WHITE,
        }
    }

    pub fn selected(self, slot: usize) -> Self {
        Self {
            selected: Some(slot),
            ..self
        }
    }

    pub fn border_color(self, border_color: Color) -> Self {
        Self {
            border_color,
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn slot_width() -> u16 {
        MAX_SHAPE_SIZE as u16 * CellDisplay::width() + 2
    }

    #[expect(clippy::cast_possible_truncation)]
    fn slot_height() -> u16 {
        MAX_SHAPE_SIZE as u16 * CellDisplay::height() + 2
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        let slots = TRAY_CAPACITY as u16;
        slots * Self::slot_width() + (slots - 1) * SLOT_SPACING
    }

    pub fn height(&self) -> u16 {
        Self::slot_height()
    }
}

impl Widget for TrayDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TrayDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let slot_areas = area.layout::<TRAY_CAPACITY>(
            &Layout::horizontal([Constraint::Length(TrayDisplay::slot_width()); TRAY_CAPACITY])
                .flex(Flex::Center)
                .spacing(SLOT_SPACING),
        );
        for (slot, slot_area) in slot_areas.into_iter().enumerate() {
            let border_color = if self.selected == Some(slot) {
                color::YELLOW
            } else {
                self.border_color
            };
            let panel = BlockWidget::bordered()
                .title(Line::from(format!("{}", slot + 1)).centered())
                .border_style(Style::new().fg(border_color))
                .style(style::DEFAULT);
            let inner = panel.inner(slot_area);
            panel.render(slot_area, buf);
            if let Some(shape) = self.tray.get(slot) {
                render_shape(shape, inner, buf);
            }
        }
    }
}

#[expect(clippy::cast_possible_truncation)]
fn render_shape(shape: &Shape, area: Rect, buf: &mut Buffer) {
    let matrix = shape.matrix();
    let (width, height) = (matrix.width() as u16, matrix.height() as u16);
    let shape_area = area.centered(
        Constraint::Length(width * CellDisplay::width()),
        Constraint::Length(height * CellDisplay::height()),
    );

    let col_constraints = (0..width).map(|_| Constraint::Length(CellDisplay::width()));
    let row_constraints = (0..height).map(|_| Constraint::Length(CellDisplay::height()));
    let horizontal = Layout::horizontal(col_constraints);
    let vertical = Layout::vertical(row_constraints);
    let grid_rows = shape_area
        .layout_vec(&vertical)
        .into_iter()
        .map(|row| row.layout_vec(&horizontal));

    let filled = CellDisplay::new(style::shape(shape.color()), "");
    for (y, grid_row) in grid_rows.enumerate() {
        for (x, grid_cell) in iter::zip(0.., grid_row) {
            if matrix.is_filled(x, y) {
                filled.render(grid_cell, buf);
            } else {
                CellDisplay::EMPTY.render(grid_cell, buf);
            }
        }
    }
}
