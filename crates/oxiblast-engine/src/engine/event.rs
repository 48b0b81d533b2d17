use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{FullLines, Position, Shape};

/// The `(score, lines, level)` triple handed to renderers and persistence layers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: usize,
    pub lines: usize,
    pub level: usize,
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score {}, lines {}, level {}",
            self.score, self.lines, self.level
        )
    }
}

/// A state change reported by a [`GameSession`](super::GameSession).
///
/// Events are queued in the order they happen and handed out by
/// [`GameSession::drain_events`](super::GameSession::drain_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ShapePlaced {
        shape: Shape,
        position: Position,
        points: usize,
    },
    LinesCleared(FullLines),
    ScoreChanged(ScoreSummary),
    TrayRefilled,
    HintChanged { active: bool },
    PauseChanged { paused: bool },
    GameOver(ScoreSummary),
    Restarted,
}

/// Receives session events from
/// [`GameSession::dispatch_events`](super::GameSession::dispatch_events).
///
/// Every method has an empty default, so observers only implement what they need.
/// `on_event` sees every event first; the specific callbacks follow for the events
/// they cover.
pub trait SessionObserver {
    fn on_event(&mut self, _event: &SessionEvent) {}
    fn on_score_changed(&mut self, _summary: ScoreSummary) {}
    fn on_lines_cleared(&mut self, _lines: FullLines) {}
    fn on_game_over(&mut self, _summary: ScoreSummary) {}
}

pub(crate) fn dispatch(observer: &mut dyn SessionObserver, event: &SessionEvent) {
    observer.on_event(event);
    match *event {
        SessionEvent::ScoreChanged(summary) => observer.on_score_changed(summary),
        SessionEvent::LinesCleared(lines) => observer.on_lines_cleared(lines),
        SessionEvent::GameOver(summary) => observer.on_game_over(summary),
        SessionEvent::ShapePlaced { .. }
        | SessionEvent::TrayRefilled
        | SessionEvent::HintChanged { .. }
        | SessionEvent::PauseChanged { .. }
        | SessionEvent::Restarted => {}
    }
}
