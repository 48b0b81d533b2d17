use std::path::PathBuf;

use oxiblast_engine::{Difficulty, GameSession, ShapeSeed};
use rand::Rng as _;

use crate::{
    command::play::app::PlayApp,
    record::{DEFAULT_DATA_DIR, DataDir},
    tui, util,
};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Difficulty to play at [default: from settings.json, else normal]
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Seed for the shape sequence (up to 32 hex digits)
    #[clap(long, value_parser = util::parse_seed)]
    seed: Option<ShapeSeed>,
    /// Directory holding scores, challenges and settings
    #[clap(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            difficulty: None,
            seed: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        difficulty,
        seed,
        data_dir,
    } = arg;

    let data_dir = DataDir::new(data_dir);
    let difficulty = difficulty.unwrap_or_else(|| data_dir.load_settings().difficulty);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(%difficulty, %seed, "starting game");

    let mut app = PlayApp::new(GameSession::with_seed(difficulty, seed), data_dir);
    tui::run(&mut app)?;

    println!("{} ({difficulty}, seed {seed})", app.session().summary());
    Ok(())
}
