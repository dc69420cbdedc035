use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use rand::{
    Rng, SeedableRng as _,
    distr::{Bernoulli, Distribution as _},
    rngs::StdRng,
};
use rand_distr::Normal;
use serde::Serialize;
use sushi_engine::{
    GameSession, MemoryScoreStore, Piece, ScoreBoard, ScoreStore, SessionConfig, Side,
    TowerSeed,
};

use crate::{command::CommonArg, logging, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of runs to play
    #[arg(long, default_value_t = 100)]
    runs: usize,
    /// Probability that the player strikes the wrong side
    #[arg(long, default_value_t = 0.02)]
    error_rate: f64,
    /// Mean number of frames between two strikes
    #[arg(long, default_value_t = 6.0)]
    reaction_ticks: f64,
    /// Standard deviation of the frames between two strikes
    #[arg(long, default_value_t = 2.0)]
    reaction_jitter: f64,
    /// Stop a run that is still alive after this many strikes
    #[arg(long, default_value_t = 10_000)]
    max_strikes: u64,
    /// Frames per second used to derive the play time
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f64,
    /// Play against a copy of the stored scores and leave the score file untouched
    #[arg(long)]
    dry_run: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Why a simulated run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RunEnd {
    Collision,
    Exhausted,
    /// Hit the strike limit while still alive. Nothing is saved for such a run.
    Cutoff,
}

#[derive(Debug, Clone, Serialize)]
struct RunSummary {
    tower_seed: TowerSeed,
    score: usize,
    end: RunEnd,
    strikes: u64,
    ticks: u64,
    elapsed_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    started_at: DateTime<Utc>,
    seed: TowerSeed,
    dry_run: bool,
    scores_before: ScoreBoard,
    scores_after: ScoreBoard,
    mean_score: f64,
    best_score: usize,
    runs: Vec<RunSummary>,
}

/// Simulated player: reacts after a noisy number of frames and sometimes
/// misreads the tower.
#[derive(Debug)]
struct Player {
    rng: StdRng,
    reaction: Normal<f64>,
    misread: Bernoulli,
}

impl Player {
    fn new(seed: TowerSeed, arg: &SimulateArg) -> anyhow::Result<Self> {
        let reaction = Normal::new(arg.reaction_ticks, arg.reaction_jitter)
            .map_err(|e| anyhow::anyhow!("Invalid reaction time: {e}"))?;
        let misread = Bernoulli::new(arg.error_rate)
            .map_err(|e| anyhow::anyhow!("Invalid error rate: {e}"))?;
        let mut rng_seed = [0; 32];
        rng_seed[..16].copy_from_slice(&seed.to_bytes());
        Ok(Self {
            rng: StdRng::from_seed(rng_seed),
            reaction,
            misread,
        })
    }

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn reaction_ticks(&mut self) -> u32 {
        self.reaction.sample(&mut self.rng).max(0.0).round() as u32
    }

    /// Picks the side to strike from: away from a threatening piece, otherwise
    /// wherever the character already stands.
    fn choose_side(&mut self, front: Piece, standing: Side) -> Side {
        let safe = if front.side().is_threatening() {
            front.side().opposite()
        } else {
            standing
        };
        if self.misread.sample(&mut self.rng) {
            safe.opposite()
        } else {
            safe
        }
    }
}

pub(crate) fn run(common: &CommonArg, arg: &SimulateArg) -> anyhow::Result<()> {
    logging::init(logging::LogTarget::Stderr, common.verbose)?;
    anyhow::ensure!(arg.tick_rate > 0.0, "Tick rate must be positive");

    let config = common.session_config()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    let mut file_store = common.open_score_store();

    let report = if arg.dry_run {
        let mut store = MemoryScoreStore::with_scores(ScoreBoard::load(&mut file_store));
        simulate(&mut store, &config, seed, arg)?
    } else {
        simulate(&mut file_store, &config, seed, arg)?
    };

    tracing::info!(
        runs = report.runs.len(),
        mean_score = report.mean_score,
        best_score = report.best_score,
        "simulation finished"
    );
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

fn simulate<S>(
    store: &mut S,
    config: &SessionConfig,
    seed: TowerSeed,
    arg: &SimulateArg,
) -> anyhow::Result<SimulationReport>
where
    S: ScoreStore,
{
    let started_at = Utc::now();
    let scores_before = ScoreBoard::load(store);
    let dt = Duration::from_secs_f64(1.0 / arg.tick_rate);
    let mut player = Player::new(seed, arg)?;

    let mut runs = Vec::with_capacity(arg.runs);
    for index in 0..arg.runs {
        let tower_seed = player.rng.random();
        let run_config = SessionConfig {
            seed: Some(tower_seed),
            ..config.clone()
        };
        let mut session = GameSession::new(run_config, &mut *store, ());
        let summary = play_run(&mut player, &mut session, tower_seed, arg.max_strikes, dt)?;
        tracing::debug!(index, score = summary.score, end = ?summary.end, "run finished");
        runs.push(summary);
    }

    let best_score = runs.iter().map(|run| run.score).max().unwrap_or(0);
    #[expect(clippy::cast_precision_loss)]
    let mean_score = if runs.is_empty() {
        0.0
    } else {
        runs.iter().map(|run| run.score as f64).sum::<f64>() / runs.len() as f64
    };

    Ok(SimulationReport {
        started_at,
        seed,
        dry_run: arg.dry_run,
        scores_before,
        scores_after: ScoreBoard::load(store),
        mean_score,
        best_score,
        runs,
    })
}

fn play_run<S>(
    player: &mut Player,
    session: &mut GameSession<S>,
    tower_seed: TowerSeed,
    max_strikes: u64,
    dt: Duration,
) -> anyhow::Result<RunSummary>
where
    S: ScoreStore,
{
    session.press_play();

    let end = 'run: loop {
        if session.run_stats().strikes() >= max_strikes {
            break RunEnd::Cutoff;
        }
        for _ in 0..player.reaction_ticks() {
            if session.tick(dt).is_depleted() {
                break 'run RunEnd::Exhausted;
            }
        }
        let side = player.choose_side(session.tower().front()?, session.character_side());
        if session.strike(side)?.is_collision() {
            break RunEnd::Collision;
        }
    };

    let stats = session.run_stats();
    Ok(RunSummary {
        tower_seed,
        score: session.tracker().score(),
        end,
        strikes: stats.strikes(),
        ticks: stats.ticks(),
        elapsed_secs: stats.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: TowerSeed = TowerSeed::from_bytes([7; 16]);

    fn arg(error_rate: f64, reaction_ticks: f64) -> SimulateArg {
        SimulateArg {
            runs: 5,
            error_rate,
            reaction_ticks,
            reaction_jitter: 0.0,
            max_strikes: 200,
            tick_rate: 60.0,
            dry_run: true,
            output: None,
        }
    }

    #[test]
    fn test_perfect_player_reaches_cutoff() {
        let arg = arg(0.0, 3.0);
        let mut store = MemoryScoreStore::new();
        let report = simulate(&mut store, &SessionConfig::default(), SEED, &arg)
            .unwrap();
        assert_eq!(report.runs.len(), 5);
        for run in &report.runs {
            assert_eq!(run.end, RunEnd::Cutoff);
            assert_eq!(run.score, 200);
        }
        // cut off runs never reach game over, so nothing is saved
        assert_eq!(report.scores_after, ScoreBoard::default());
    }

    #[test]
    fn test_slow_player_runs_out_of_health() {
        let arg = arg(0.0, 20.0);
        let mut store = MemoryScoreStore::new();
        let report = simulate(&mut store, &SessionConfig::default(), SEED, &arg)
            .unwrap();
        for run in &report.runs {
            assert_eq!(run.end, RunEnd::Exhausted);
        }
        assert_eq!(store.flushes(), 5);
        assert_eq!(report.scores_after.last_score, report.runs[4].score);
    }

    #[test]
    fn test_reckless_player_collides_and_saves_scores() {
        let arg = arg(1.0, 0.0);
        let mut store = MemoryScoreStore::new();
        let report = simulate(&mut store, &SessionConfig::default(), SEED, &arg)
            .unwrap();
        for run in &report.runs {
            assert_eq!(run.end, RunEnd::Collision);
        }
        assert_eq!(report.scores_after.high_score, report.best_score);
        assert_eq!(store.flushes(), 5);
    }

    #[test]
    fn test_same_seed_same_report() {
        let arg = arg(0.1, 4.0);
        let run = || {
            let mut store = MemoryScoreStore::new();
            simulate(&mut store, &SessionConfig::default(), SEED, &arg).unwrap()
        };
        let (a, b) = (run(), run());
        let scores = |report: &SimulationReport| {
            report.runs.iter().map(|r| (r.score, r.end)).collect::<Vec<_>>()
        };
        assert_eq!(scores(&a), scores(&b));
    }
}
