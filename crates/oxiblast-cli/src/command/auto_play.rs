use std::path::PathBuf;

use oxiblast_engine::{Difficulty, GameSession, ScoreSummary, ShapeSeed};
use rand::Rng as _;
use serde::Serialize;

use crate::{
    policy::{PlacementPolicy, PolicyKind},
    record::{DEFAULT_DATA_DIR, DataDir},
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[clap(long, default_value_t = 1)]
    games: usize,
    /// Placement policy
    #[clap(long, value_enum, default_value_t = PolicyKind::default())]
    policy: PolicyKind,
    /// Difficulty to play at [default: from settings.json, else normal]
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Seed for the first game; later games continue the same shape stream
    #[clap(long, value_parser = util::parse_seed)]
    seed: Option<ShapeSeed>,
    /// Stop a game after this many placements
    #[clap(long, default_value_t = 10_000)]
    max_turns: usize,
    /// Save finished games to the score history and daily challenge
    #[clap(long)]
    record: bool,
    /// Directory holding scores, challenges and settings
    #[clap(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Write the JSON report to this file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct GameResult {
    game: usize,
    turns: usize,
    /// `false` when the game hit the turn limit
    game_over: bool,
    summary: ScoreSummary,
}

#[derive(Debug, Clone, Serialize)]
struct AutoPlayReport {
    policy: PolicyKind,
    difficulty: Difficulty,
    seed: ShapeSeed,
    mean_score: f64,
    max_score: usize,
    mean_lines: f64,
    games: Vec<GameResult>,
}

impl AutoPlayReport {
    #[expect(clippy::cast_precision_loss)]
    fn new(policy: PolicyKind, session: &GameSession, games: Vec<GameResult>) -> Self {
        let count = games.len().max(1) as f64;
        let total_score = games.iter().map(|g| g.summary.score).sum::<usize>();
        let total_lines = games.iter().map(|g| g.summary.lines).sum::<usize>();
        Self {
            policy,
            difficulty: session.difficulty(),
            seed: session.seed(),
            mean_score: total_score as f64 / count,
            max_score: games.iter().map(|g| g.summary.score).max().unwrap_or(0),
            mean_lines: total_lines as f64 / count,
            games,
        }
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        policy,
        difficulty,
        seed,
        max_turns,
        record,
        data_dir,
        output,
    } = arg;

    let data_dir = DataDir::new(data_dir);
    let difficulty = difficulty.unwrap_or_else(|| data_dir.load_settings().difficulty);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut session = GameSession::with_seed(difficulty, seed);
    let placement_policy = policy.policy();

    eprintln!("Playing {games} games ({policy:?}, {difficulty}, seed {seed})");
    let mut results = Vec::with_capacity(*games);
    for game in 0..*games {
        if game > 0 {
            session.restart();
        }
        let result = play_game(&mut session, placement_policy.as_ref(), game, *max_turns);
        eprintln!(
            "game {:>3}: {} after {} turns{}",
            game + 1,
            result.summary,
            result.turns,
            if result.game_over { "" } else { " (turn limit)" }
        );
        if *record && result.game_over {
            data_dir.record_game(&mut session)?;
        }
        results.push(result);
    }

    let report = AutoPlayReport::new(*policy, &session, results);
    eprintln!(
        "{} games: mean score {:.1}, max score {}, mean lines {:.1}",
        report.games.len(),
        report.mean_score,
        report.max_score,
        report.mean_lines
    );
    Output::save_json(&report, output.clone())
}

fn play_game(
    session: &mut GameSession,
    policy: &dyn PlacementPolicy,
    game: usize,
    max_turns: usize,
) -> GameResult {
    let mut turns = 0;
    while turns < max_turns && session.state().is_active() {
        let Some(mv) = policy.choose(session.board(), session.tray()) else {
            break;
        };
        if let Err(rejection) = session.attempt_place(mv.slot, mv.position.x, mv.position.y) {
            tracing::warn!(%rejection, slot = mv.slot, position = %mv.position, "policy chose a rejected move");
            break;
        }
        turns += 1;
    }
    // Auto play has no observer; drop the queued events.
    session.drain_events().for_each(drop);
    GameResult {
        game,
        turns,
        game_over: session.state().is_game_over(),
        summary: session.summary(),
    }
}
