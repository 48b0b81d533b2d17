use std::iter;

use oxiblast_engine::{BOARD_SIZE, Board, Position, ShapeMatrix};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// A shape matrix anchored at a board offset.
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub matrix: &'a ShapeMatrix,
    pub position: Position,
}

impl Overlay<'_> {
    fn covers(&self, x: usize, y: usize) -> bool {
        let Position { x: px, y: py } = self.position;
        x >= px && y >= py && self.matrix.is_filled(x - px, y - py)
    }
}

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    hint: Option<Overlay<'a>>,
    preview: Option<Overlay<'a>>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            hint: None,
            preview: None,
            block: None,
        }
    }

    pub fn hint(self, hint: Overlay<'a>) -> Self {
        Self {
            hint: Some(hint),
            ..self
        }
    }

    /// Shape the player is about to place; drawn in red where it does not fit.
    pub fn preview(self, preview: Overlay<'a>) -> Self {
        Self {
            preview: Some(preview),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        10 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_display(&self, x: usize, y: usize, preview_fits: bool) -> CellDisplay {
        if self.preview.is_some_and(|p| p.covers(x, y)) {
            if preview_fits {
                CellDisplay::PREVIEW
            } else {
                CellDisplay::PREVIEW_BLOCKED
            }
        } else if self.hint.is_some_and(|h| h.covers(x, y)) {
            CellDisplay::HINT
        } else {
            CellDisplay::from_cell(self.board.cell(x, y), true)
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let preview_fits = self
            .preview
            .is_some_and(|p| self.board.can_place(p.matrix, p.position.x, p.position.y));

        let col_constraints = (0..BOARD_SIZE).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_SIZE).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_SIZE>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_SIZE>(&horizontal));

        for (y, grid_row) in grid_cells.enumerate() {
            for (x, grid_cell) in iter::zip(0.., grid_row) {
                self.cell_display(x, y, preview_fits).render(grid_cell, buf);
            }
        }
    }
}
