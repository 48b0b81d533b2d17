use std::iter;

use oxiblast_engine::GameSession;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct SessionStatsDisplay<'a> {
    session: &'a GameSession,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        18 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&GameSession) -> String),
    LabelValue(&'static str, &'static dyn Fn(&GameSession) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|session| session.stats().score().to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|session| session.stats().level().to_string()),
    Row::LabelValue("LINES:", &|session| {
        session.stats().total_cleared_lines().to_string()
    }),
    Row::Empty,
    Row::LabelValue("SHAPES:", &|session| {
        session.stats().placed_shapes().to_string()
    }),
    Row::LabelValue("BLOCKS:", &|session| {
        session.stats().placed_blocks().to_string()
    }),
    Row::LabelValue("BONUS:", &|session| {
        session.stats().bonus_points().to_string()
    }),
    Row::Empty,
    Row::LabelValue("MODE:", &|session| session.difficulty().to_string()),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.session), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use oxiblast_engine::{Difficulty, ShapeSeed};

    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_rows_show_stats() {
        let mut session = GameSession::with_seed(Difficulty::Hard, ShapeSeed::from_bytes([6; 16]));
        let hint = session.hint().unwrap();
        session.attempt_place(0, hint.x, hint.y).unwrap();

        let display = SessionStatsDisplay::new(&session);
        let mut buf = Buffer::empty(Rect::new(0, 0, display.width(), display.height()));
        display.render(buf.area, &mut buf);

        let score = session.stats().score().to_string();
        assert_eq!(row_text(&buf, 0).trim_end(), "SCORE:");
        assert_eq!(row_text(&buf, 1).trim_start(), score);
        assert_eq!(row_text(&buf, 3), format!("LEVEL:{:>12}", 1));
        assert_eq!(row_text(&buf, 6), format!("SHAPES:{:>11}", 1));
        assert_eq!(row_text(&buf, 10), format!("MODE:{:>13}", "hard"));
    }
}
