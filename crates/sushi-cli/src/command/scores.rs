use sushi_engine::{ScoreBoard, ScoreStore as _};

use crate::{command::CommonArg, logging};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// Erase the stored scores
    #[arg(long)]
    reset: bool,
}

pub(crate) fn run(common: &CommonArg, arg: &ScoresArg) -> anyhow::Result<()> {
    logging::init(logging::LogTarget::Stderr, common.verbose)?;

    let mut store = common.open_score_store();
    let scores = ScoreBoard::load(&mut store);
    println!("High Score: {}", scores.high_score);
    println!("Last Score: {}", scores.last_score);

    if arg.reset {
        store.clear();
        store.flush()?;
        println!("Scores in {} reset", store.path().display());
    }
    Ok(())
}
