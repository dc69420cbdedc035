use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sushi_engine::{RestartState, SessionConfig, TowerSeed};

use crate::{store::JsonFileScoreStore, util};

use self::{play::PlayArg, scores::ScoresArg, simulate::SimulateArg};

mod play;
mod scores;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    common: CommonArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run headless games with a simulated player
    Simulate(#[clap(flatten)] SimulateArg),
    /// Show or reset the stored scores
    Scores(#[clap(flatten)] ScoresArg),
}

/// Options shared by all modes.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CommonArg {
    /// JSON file holding the high score and last score
    #[arg(long, global = true, default_value = "./data/scores.json")]
    score_file: PathBuf,
    /// JSON session config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for the piece generator (32 hex characters)
    #[arg(long, global = true)]
    seed: Option<TowerSeed>,
    /// Skip the title screen when restarting after a game over
    #[arg(long, global = true)]
    quick_restart: bool,
    /// Write logs to this file (the play mode logs nothing without it)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl CommonArg {
    pub(crate) fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<SessionConfig, _>("session config", path)?,
            None => SessionConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.quick_restart {
            config.restart_state = RestartState::Ready;
        }
        Ok(config)
    }

    pub(crate) fn open_score_store(&self) -> JsonFileScoreStore {
        JsonFileScoreStore::open(&self.score_file)
    }
}

pub fn run() -> anyhow::Result<()> {
    let CommandArgs { common, mode } = CommandArgs::parse();
    match mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&common, &arg)?,
        Mode::Simulate(arg) => simulate::run(&common, &arg)?,
        Mode::Scores(arg) => scores::run(&common, &arg)?,
    }
    Ok(())
}
