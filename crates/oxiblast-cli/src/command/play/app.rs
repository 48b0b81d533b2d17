use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use oxiblast_engine::{
    BOARD_SIZE, FullLines, GameSession, Position, ScoreSummary, SessionObserver, SessionState,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    record::{DataDir, RecordedGame},
    tui::App,
    ui::widgets::{KeyBinding, KeyBindingDisplay, Selection, SessionDisplay},
};

/// Messages kept for the message panel.
const MAX_MESSAGES: usize = 32;

const ACTIVE_BINDINGS: &[KeyBinding] = &[
    (&["←", "→", "↑", "↓"], "Aim"),
    (&["1", "2", "3", "Tab"], "Shape"),
    (&["Enter", "Space"], "Place"),
    (&["H"], "Hint"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Q"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[(&["P"], "Resume"), (&["R"], "Restart"), (&["Q"], "Quit")];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["R"], "New game"), (&["Q"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Aim { dx: isize, dy: isize },
    Select(usize),
    NextSlot,
    Place,
    Hint,
    Pause,
    Restart,
    Quit,
}

impl Action {
    fn from_key(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let action = match key.code {
            KeyCode::Left => Action::Aim { dx: -1, dy: 0 },
            KeyCode::Right => Action::Aim { dx: 1, dy: 0 },
            KeyCode::Up => Action::Aim { dx: 0, dy: -1 },
            KeyCode::Down => Action::Aim { dx: 0, dy: 1 },
            KeyCode::Char('1') => Action::Select(0),
            KeyCode::Char('2') => Action::Select(1),
            KeyCode::Char('3') => Action::Select(2),
            KeyCode::Tab => Action::NextSlot,
            KeyCode::Enter | KeyCode::Char(' ') => Action::Place,
            KeyCode::Char('h' | 'H') => Action::Hint,
            KeyCode::Char('p' | 'P') => Action::Pause,
            KeyCode::Char('r' | 'R') => Action::Restart,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// Collects what the player should be told about the last action.
#[derive(Debug, Default)]
struct Announcer {
    messages: Vec<String>,
    game_over: Option<ScoreSummary>,
}

impl SessionObserver for Announcer {
    fn on_lines_cleared(&mut self, lines: FullLines) {
        let count = lines.count();
        let noun = if count == 1 { "line" } else { "lines" };
        self.messages.push(format!("Cleared {count} {noun}!"));
    }

    fn on_game_over(&mut self, summary: ScoreSummary) {
        self.messages.push(format!("Game over: {summary}"));
        self.game_over = Some(summary);
    }
}

#[derive(Debug)]
pub(super) struct PlayApp {
    session: GameSession,
    data_dir: DataDir,
    selection: Selection,
    announcer: Announcer,
    messages: Vec<String>,
    is_exiting: bool,
}

impl PlayApp {
    pub(super) fn new(session: GameSession, data_dir: DataDir) -> Self {
        let mut app = Self {
            session,
            data_dir,
            selection: Selection {
                slot: 0,
                cursor: Position::new(0, 0),
            },
            announcer: Announcer::default(),
            messages: vec![],
            is_exiting: false,
        };
        app.push_message(format!(
            "{} game, seed {}",
            app.session.difficulty(),
            app.session.seed()
        ));
        app
    }

    pub(super) fn session(&self) -> &GameSession {
        &self.session
    }

    fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        let excess = self.messages.len().saturating_sub(MAX_MESSAGES);
        self.messages.drain(..excess);
    }

    fn apply(&mut self, action: Action) -> anyhow::Result<()> {
        let result = match action {
            Action::Aim { dx, dy } => {
                let Position { x, y } = self.selection.cursor;
                self.selection.cursor =
                    Position::new(x.saturating_add_signed(dx), y.saturating_add_signed(dy));
                Ok(())
            }
            Action::Select(slot) => {
                if slot < self.session.tray().len() {
                    self.selection.slot = slot;
                }
                Ok(())
            }
            Action::NextSlot => {
                let len = self.session.tray().len();
                if len > 0 {
                    self.selection.slot = (self.selection.slot + 1) % len;
                }
                Ok(())
            }
            Action::Place => {
                let Selection { slot, cursor } = self.selection;
                self.session.attempt_place(slot, cursor.x, cursor.y).map(|_| ())
            }
            Action::Hint => match self.session.toggle_hint() {
                Ok(true) if self.session.active_hint().is_none() => {
                    self.push_message("Shape 1 does not fit anywhere.");
                    Ok(())
                }
                result => result.map(|_| ()),
            },
            Action::Pause => self.session.toggle_pause().map(|_| ()),
            Action::Restart => {
                self.session.restart();
                self.push_message("New game.");
                Ok(())
            }
            Action::Quit => {
                self.is_exiting = true;
                Ok(())
            }
        };
        if let Err(rejection) = result {
            self.push_message(format!("Rejected: {rejection}"));
        }

        self.session.dispatch_events(&mut self.announcer);
        for message in std::mem::take(&mut self.announcer.messages) {
            self.push_message(message);
        }
        if self.announcer.game_over.take().is_some() {
            let recorded = self.data_dir.record_game(&mut self.session)?;
            for message in record_messages(&recorded) {
                self.push_message(message);
            }
            // The bonus only queues a score change, which needs no message.
            self.session.dispatch_events(&mut self.announcer);
        }

        self.keep_selection_in_bounds();
        Ok(())
    }

    /// Keeps the selected slot inside the tray and the selected shape inside the board.
    fn keep_selection_in_bounds(&mut self) {
        let tray = self.session.tray();
        if tray.is_empty() {
            return;
        }
        self.selection.slot = self.selection.slot.min(tray.len() - 1);
        let Some(shape) = tray.get(self.selection.slot) else {
            return;
        };
        let matrix = shape.matrix();
        let cursor = &mut self.selection.cursor;
        cursor.x = cursor.x.min(BOARD_SIZE - matrix.width());
        cursor.y = cursor.y.min(BOARD_SIZE - matrix.height());
    }
}

fn record_messages(recorded: &RecordedGame) -> Vec<String> {
    let mut messages = vec![];
    if let Some(rank) = recorded.rank {
        messages.push(format!("Saved as #{} in the score history.", rank + 1));
    }
    let challenge = &recorded.challenge.progress;
    messages.push(match recorded.bonus {
        Some(bonus) => format!(
            "Daily challenge complete: {} (+{bonus} points)",
            challenge.goal
        ),
        None if challenge.completed => {
            format!("Daily challenge already complete: {}", challenge.goal)
        }
        None => format!(
            "Daily challenge: {} ({}/{})",
            challenge.goal, challenge.progress, challenge.goal.target
        ),
    });
    messages
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) -> anyhow::Result<()> {
        match event.as_key_event().and_then(Action::from_key) {
            Some(action) => self.apply(action),
            None => Ok(()),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display = SessionDisplay::new(&self.session)
            .selection(self.selection)
            .messages(&self.messages);
        let bindings = match self.session.state() {
            SessionState::Active => ACTIVE_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        };

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }
}
