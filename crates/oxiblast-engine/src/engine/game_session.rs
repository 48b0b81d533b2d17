use rand::Rng as _;

use crate::{
    Rejection,
    core::{Board, FullLines, Position, Shape},
};

use super::{
    catalog::Difficulty,
    event::{self, ScoreSummary, SessionEvent, SessionObserver},
    game_stats::GameStats,
    hint,
    shape_generator::{ShapeGenerator, ShapeSeed},
    tray::Tray,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Active,
    Paused,
    GameOver,
}

/// What an accepted placement did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub blocks_placed: usize,
    pub cleared: FullLines,
    pub points: usize,
    pub summary: ScoreSummary,
    /// The placement emptied the tray and three new shapes were dealt.
    pub tray_refilled: bool,
    pub game_over: bool,
}

/// One game: board, tray, score and the state machine around them.
///
/// All mutation goes through `&mut self` methods, and a placement applies its line
/// clears before returning, so callers never observe a half-cleared board.
///
/// # Example
///
/// ```
/// use oxiblast_engine::{Difficulty, GameSession};
///
/// let mut session = GameSession::new(Difficulty::Normal);
/// let hint = session.hint().unwrap(); // an empty board fits anything
/// let outcome = session.attempt_place(0, hint.x, hint.y).unwrap();
///
/// assert!(outcome.points > 0);
/// assert_eq!(session.tray().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    tray: Tray,
    stats: GameStats,
    generator: ShapeGenerator,
    state: SessionState,
    hint_active: bool,
    events: Vec<SessionEvent>,
}

impl GameSession {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_seed(difficulty, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(difficulty: Difficulty, seed: ShapeSeed) -> Self {
        Self::with_position(Board::EMPTY, [], difficulty, seed)
    }

    /// Starts a session from an arbitrary board and tray.
    ///
    /// An empty `shapes` list deals a fresh tray. The game-over check runs right
    /// away, so a position where nothing fits starts out as [`SessionState::GameOver`].
    ///
    /// # Panics
    ///
    /// Panics if more than three shapes are given.
    #[must_use]
    pub fn with_position<I>(board: Board, shapes: I, difficulty: Difficulty, seed: ShapeSeed) -> Self
    where
        I: IntoIterator<Item = Shape>,
    {
        let mut generator = ShapeGenerator::with_seed(difficulty, seed);
        let mut tray = Tray::from_shapes(shapes);
        if tray.is_empty() {
            tray.refill(&mut generator);
        }
        let mut session = Self {
            board,
            tray,
            stats: GameStats::new(),
            generator,
            state: SessionState::Active,
            hint_active: false,
            events: vec![],
        };
        session.check_game_over();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.generator.difficulty()
    }

    #[must_use]
    pub fn seed(&self) -> ShapeSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            score: self.stats.score(),
            lines: self.stats.total_cleared_lines(),
            level: self.stats.level(),
        }
    }

    /// Places tray shape `tray_index` with its top-left corner at `(x, y)`.
    ///
    /// On success the shape leaves the tray (later slots shift down), full lines are
    /// cleared and scored, an emptied tray is refilled and the hint is switched off.
    /// Finally the session checks whether any tray shape still fits anywhere.
    ///
    /// A rejected attempt leaves the session untouched.
    pub fn attempt_place(
        &mut self,
        tray_index: usize,
        x: usize,
        y: usize,
    ) -> Result<PlacementOutcome, Rejection> {
        self.ensure_active()?;
        let shape = *self
            .tray
            .get(tray_index)
            .ok_or(Rejection::InvalidTrayIndex {
                index: tray_index,
                len: self.tray.len(),
            })?;
        if !self.board.can_place(shape.matrix(), x, y) {
            return Err(Rejection::InvalidTarget { x, y });
        }

        let blocks_placed = shape.block_count();
        self.board.place(shape.matrix(), x, y, shape.color());
        self.tray.take(tray_index);

        let cleared = self.board.find_full_lines();
        if !cleared.is_empty() {
            self.board.clear(cleared);
        }
        let points = self.stats.complete_placement(blocks_placed, cleared.count());
        tracing::debug!(tray_index, x, y, blocks_placed, points, "shape placed");

        self.events.push(SessionEvent::ShapePlaced {
            shape,
            position: Position::new(x, y),
            points,
        });
        if !cleared.is_empty() {
            tracing::debug!(
                rows = cleared.rows.len(),
                cols = cleared.cols.len(),
                level = self.stats.level(),
                "lines cleared"
            );
            self.events.push(SessionEvent::LinesCleared(cleared));
        }
        self.events.push(SessionEvent::ScoreChanged(self.summary()));

        let tray_refilled = self.tray.is_empty();
        if tray_refilled {
            self.tray.refill(&mut self.generator);
            self.events.push(SessionEvent::TrayRefilled);
        }
        self.hide_hint();
        self.check_game_over();

        Ok(PlacementOutcome {
            blocks_placed,
            cleared,
            points,
            summary: self.summary(),
            tray_refilled,
            game_over: self.state.is_game_over(),
        })
    }

    /// Switches between active and paused; returns whether the session is now paused.
    pub fn toggle_pause(&mut self) -> Result<bool, Rejection> {
        self.state = match self.state {
            SessionState::Active => SessionState::Paused,
            SessionState::Paused => SessionState::Active,
            SessionState::GameOver => return Err(Rejection::GameOver),
        };
        let paused = self.state.is_paused();
        self.events.push(SessionEvent::PauseChanged { paused });
        Ok(paused)
    }

    /// Throws the current game away and deals a new one.
    ///
    /// The shape generator keeps its random stream, so a seeded session replays
    /// identically across restarts.
    pub fn restart(&mut self) {
        self.board = Board::EMPTY;
        self.stats = GameStats::new();
        self.tray.clear();
        self.tray.refill(&mut self.generator);
        self.state = SessionState::Active;
        self.hint_active = false;
        self.events.clear();
        self.events.push(SessionEvent::Restarted);
        tracing::info!(difficulty = %self.difficulty(), "session restarted");
    }

    /// Where the first tray shape fits, scanning rows top to bottom.
    #[must_use]
    pub fn hint(&self) -> Option<Position> {
        self.tray
            .first()
            .and_then(|shape| hint::find_hint(&self.board, shape.matrix()))
    }

    #[must_use]
    pub fn hint_active(&self) -> bool {
        self.hint_active
    }

    /// The hint position while the hint is switched on.
    #[must_use]
    pub fn active_hint(&self) -> Option<Position> {
        self.hint_active.then(|| self.hint()).flatten()
    }

    /// Switches the hint on and returns where it points.
    pub fn show_hint(&mut self) -> Result<Option<Position>, Rejection> {
        self.ensure_active()?;
        if !self.hint_active {
            self.hint_active = true;
            self.events.push(SessionEvent::HintChanged { active: true });
        }
        Ok(self.hint())
    }

    pub fn hide_hint(&mut self) {
        if self.hint_active {
            self.hint_active = false;
            self.events.push(SessionEvent::HintChanged { active: false });
        }
    }

    /// Flips the hint; returns whether it is now shown.
    pub fn toggle_hint(&mut self) -> Result<bool, Rejection> {
        if self.hint_active {
            self.ensure_active()?;
            self.hide_hint();
        } else {
            self.show_hint()?;
        }
        Ok(self.hint_active)
    }

    /// Adds bonus points, e.g. for a completed daily challenge.
    pub fn award_bonus(&mut self, points: usize) {
        if points == 0 {
            return;
        }
        self.stats.add_bonus(points);
        self.events.push(SessionEvent::ScoreChanged(self.summary()));
    }

    /// Takes every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    /// Drains the event queue into `observer`.
    pub fn dispatch_events(&mut self, observer: &mut dyn SessionObserver) {
        for event in self.events.drain(..) {
            event::dispatch(observer, &event);
        }
    }

    fn ensure_active(&self) -> Result<(), Rejection> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Paused => Err(Rejection::Paused),
            SessionState::GameOver => Err(Rejection::GameOver),
        }
    }

    fn check_game_over(&mut self) {
        let any_fits = self
            .tray
            .iter()
            .any(|shape| hint::find_hint(&self.board, shape.matrix()).is_some());
        if any_fits {
            return;
        }
        self.state = SessionState::GameOver;
        self.hint_active = false;
        let summary = self.summary();
        tracing::info!(%summary, placed_shapes = self.stats.placed_shapes(), "game over");
        self.events.push(SessionEvent::GameOver(summary));
    }
}
