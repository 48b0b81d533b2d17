use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, history::HistoryArg, play::PlayArg};

mod auto_play;
mod history;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play interactively with text commands on stdin
    Play(#[clap(flatten)] PlayArg),
    /// Let a placement policy play headless games
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Show the best scores and today's challenge
    History(#[clap(flatten)] HistoryArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::History(arg) => history::run(&arg)?,
    }
    Ok(())
}
