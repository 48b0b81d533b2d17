use oxiblast_engine::{GameSession, Position, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

use crate::ui::widgets::{BoardDisplay, Overlay, SessionStatsDisplay, TrayDisplay, color, style};

/// Lines of the message panel under the tray.
pub const MESSAGE_LINES: usize = 3;

/// Tray slot the player is aiming with, and where its top-left corner sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub slot: usize,
    pub cursor: Position,
}

#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    selection: Option<Selection>,
    messages: &'a [String],
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            selection: None,
            messages: &[],
        }
    }

    pub fn selection(self, selection: Selection) -> Self {
        Self {
            selection: Some(selection),
            ..self
        }
    }

    /// Shows the last [`MESSAGE_LINES`] messages.
    pub fn messages(self, messages: &'a [String]) -> Self {
        Self { messages, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    #[expect(clippy::cast_possible_truncation)]
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session;
        let state = session.state();
        let border_color = match state {
            SessionState::Active => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let bordered = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(Style::new().fg(border_color))
                .style(style::DEFAULT)
        };

        let mut game_board = BoardDisplay::new(session.board()).block(bordered(""));
        if let Some((position, shape)) = session.active_hint().zip(session.tray().first()) {
            game_board = game_board.hint(Overlay {
                matrix: shape.matrix(),
                position,
            });
        }
        let mut tray = TrayDisplay::new(session.tray()).border_color(border_color);
        if let Some(selection) = self.selection.filter(|_| state.is_active()) {
            if let Some(shape) = session.tray().get(selection.slot) {
                game_board = game_board.preview(Overlay {
                    matrix: shape.matrix(),
                    position: selection.cursor,
                });
            }
            tray = tray.selected(selection.slot);
        }
        let session_stats = SessionStatsDisplay::new(session)
            .block(bordered("STATS").padding(Padding::horizontal(1)));
        let first_message = self.messages.len().saturating_sub(MESSAGE_LINES);
        let messages = Paragraph::new(
            self.messages[first_message..]
                .iter()
                .map(|message| Line::from(message.as_str()))
                .collect::<Vec<_>>(),
        )
        .block(bordered("").padding(Padding::horizontal(1)));

        let center_width = u16::max(game_board.width(), tray.width());
        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(center_width),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area, tray_area, messages_area] = Layout::vertical([
            Constraint::Length(game_board.height()),
            Constraint::Length(tray.height()),
            Constraint::Length(MESSAGE_LINES as u16 + 2),
        ])
        .areas(center_column);
        let board_area = board_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(game_board.width())]).flex(Flex::Center),
        )[0];

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        tray.render(tray_area, buf);
        messages.render(messages_area, buf);

        let popup = match state {
            SessionState::Active => None,
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use oxiblast_engine::{Difficulty, ShapeSeed};

    use super::*;

    fn render(display: &SessionDisplay<'_>) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 64, 26));
        display.render(buf.area, &mut buf);
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn session() -> GameSession {
        GameSession::with_seed(Difficulty::Normal, ShapeSeed::from_bytes([8; 16]))
    }

    #[test]
    fn test_active_session_shows_preview_and_messages() {
        let session = session();
        let messages = ["first", "second", "third", "fourth"].map(str::to_owned);
        let display = SessionDisplay::new(&session)
            .selection(Selection {
                slot: 0,
                cursor: Position::new(0, 0),
            })
            .messages(&messages);
        let screen = render(&display);

        assert!(screen.contains("SCORE:"));
        assert!(screen.contains("[]"));
        assert!(!screen.contains("first"));
        assert!(screen.contains("second"));
        assert!(screen.contains("fourth"));
        assert!(!screen.contains("PAUSED"));
    }

    #[test]
    fn test_paused_session_hides_preview() {
        let mut session = session();
        session.toggle_pause().unwrap();
        let display = SessionDisplay::new(&session).selection(Selection {
            slot: 0,
            cursor: Position::new(0, 0),
        });
        let screen = render(&display);

        assert!(screen.contains("PAUSED"));
        assert!(!screen.contains("[]"));
    }
}
