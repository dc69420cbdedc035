use crate::{
    command::CommonArg,
    logging::{self, LogTarget},
    tui::Tui,
};

use self::app::PlayApp;

mod app;
mod scene;

const DEFAULT_FPS: f64 = 60.0;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Frames per second; health drains once per frame [default: 60]
    #[arg(long)]
    fps: Option<f64>,
}

pub(crate) fn run(common: &CommonArg, arg: &PlayArg) -> anyhow::Result<()> {
    let fps = arg.fps.unwrap_or(DEFAULT_FPS);
    anyhow::ensure!(fps > 0.0, "Frame rate must be positive");

    logging::init(LogTarget::File(common.log_file.as_deref()), common.verbose)?;
    let config = common.session_config()?;
    let store = common.open_score_store();

    let mut app = PlayApp::new(config, store, fps);
    Tui::new().run(&mut app)?;
    app.finish()?;
    Ok(())
}
