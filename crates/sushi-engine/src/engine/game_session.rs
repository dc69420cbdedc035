use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{EmptyTowerError, Side};

use super::{
    piece_generator::PieceGenerator,
    presenter::Presenter,
    score_store::{ScoreBoard, ScoreKey, ScoreStore},
    session_config::{RestartState, SessionConfig},
    tower::Tower,
    tracker::Tracker,
};

/// The side the character stands on when a run is set up.
const INITIAL_CHARACTER_SIDE: Side = Side::Left;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum SessionState {
    /// Title mat is shown; waiting for play to be pressed.
    Title,
    /// Mat is gone; the first strike starts the run.
    Ready,
    Playing,
    GameOver,
}

/// Result of a single [`GameSession::strike`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StrikeOutcome {
    /// Not playing, or struck from [`Side::None`]; nothing changed.
    Ignored,
    /// The front piece was knocked off.
    Hit,
    /// The front piece threatened the struck side; the run is over.
    Collision,
}

/// Result of a single [`GameSession::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    Ignored,
    Decayed,
    /// Health ran out; the run is over.
    Depleted,
}

/// Counters of the current run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    elapsed: Duration,
    ticks: u64,
    strikes: u64,
}

impl RunStats {
    /// Play time accumulated from tick deltas.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Strikes resolved against the tower, including the fatal one.
    #[must_use]
    pub const fn strikes(&self) -> u64 {
        self.strikes
    }
}

/// Game state machine: owns the tower, health and score of one player.
///
/// The host drives it with three inputs, all on one thread:
///
/// - [`press_play`](Self::press_play) when the play button is activated
/// - [`strike`](Self::strike) for every tap on the left or right half
/// - [`tick`](Self::tick) once per frame
///
/// ```text
/// Title --press_play--> Ready --strike--> Playing --collision/depleted--> GameOver
///   ^                                                                      |
///   +------------------------------ press_play (full reset) ---------------+
/// ```
///
/// Scores are read from the [`ScoreStore`] when the session is created or
/// reset, and written when a run ends. Every visible change is reported to
/// the [`Presenter`].
///
/// # Example
///
/// ```
/// use sushi_engine::{GameSession, MemoryScoreStore, SessionConfig, SessionState, Side};
///
/// let mut session = GameSession::new(SessionConfig::default(), MemoryScoreStore::new(), ());
/// session.press_play();
/// assert_eq!(session.state(), SessionState::Ready);
///
/// // The opening piece is always neutral, so the first strike is safe.
/// session.strike(Side::Left).unwrap();
/// assert_eq!(session.state(), SessionState::Playing);
/// assert_eq!(session.tracker().score(), 1);
/// ```
#[derive(Debug)]
pub struct GameSession<S, P = ()> {
    config: SessionConfig,
    tower: Tower,
    tracker: Tracker,
    state: SessionState,
    character_side: Side,
    scores: ScoreBoard,
    run_stats: RunStats,
    store: S,
    presenter: P,
}

impl<S, P> GameSession<S, P>
where
    S: ScoreStore,
    P: Presenter,
{
    /// Creates a session on the title screen.
    ///
    /// The generator is seeded from `config.seed`, or randomly when unset.
    #[must_use]
    pub fn new(config: SessionConfig, store: S, presenter: P) -> Self {
        let generator = match config.seed {
            Some(seed) => PieceGenerator::with_seed(seed),
            None => PieceGenerator::new(),
        };
        Self::with_generator(config, generator, store, presenter)
    }

    /// Like [`Self::new`], but with an explicit generator.
    #[must_use]
    pub fn with_generator(
        config: SessionConfig,
        generator: PieceGenerator,
        store: S,
        presenter: P,
    ) -> Self {
        let tower = Tower::opening(generator, config.opening_random_pieces);
        let mut this = Self {
            config,
            tower,
            tracker: Tracker::new(),
            state: SessionState::Title,
            character_side: INITIAL_CHARACTER_SIDE,
            scores: ScoreBoard::default(),
            run_stats: RunStats::default(),
            store,
            presenter,
        };
        this.load_scores();
        this.presenter.on_mat_shown();
        this
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn tower(&self) -> &Tower {
        &self.tower
    }

    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    #[must_use]
    pub fn character_side(&self) -> Side {
        self.character_side
    }

    /// Scores as read from the store when this run was set up.
    #[must_use]
    pub fn scores(&self) -> ScoreBoard {
        self.scores
    }

    #[must_use]
    pub fn run_stats(&self) -> &RunStats {
        &self.run_stats
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub fn into_parts(self) -> (S, P) {
        (self.store, self.presenter)
    }

    /// Handles the play button.
    ///
    /// On the title screen this gets the player ready. After a game over it
    /// rebuilds the tower and tracker from scratch, re-reads the stored
    /// scores and enters the configured [`RestartState`]. Ignored otherwise.
    pub fn press_play(&mut self) {
        match self.state {
            SessionState::Title => {
                self.state = SessionState::Ready;
                tracing::debug!("ready");
                self.presenter.on_mat_hidden();
            }
            SessionState::GameOver => self.restart(),
            SessionState::Ready | SessionState::Playing => {}
        }
    }

    fn restart(&mut self) {
        self.tower.reset(self.config.opening_random_pieces);
        self.tracker.reset();
        self.character_side = INITIAL_CHARACTER_SIDE;
        self.run_stats = RunStats::default();
        self.state = match self.config.restart_state {
            RestartState::Title => SessionState::Title,
            RestartState::Ready => SessionState::Ready,
        };
        tracing::debug!(state = %self.state, "session reset");

        self.load_scores();
        self.presenter.on_score_changed(self.tracker.score());
        self.presenter
            .on_health_changed(self.tracker.health().value());
        match self.state {
            SessionState::Title => self.presenter.on_mat_shown(),
            _ => self.presenter.on_mat_hidden(),
        }
    }

    fn load_scores(&mut self) {
        self.scores = ScoreBoard::load(&mut self.store);
        tracing::debug!(
            high_score = self.scores.high_score,
            last_score = self.scores.last_score,
            "scores loaded"
        );
        self.presenter.on_scores_loaded(self.scores);
    }

    /// Strikes the front piece from `side`.
    ///
    /// The first strike after getting ready starts the run. Striking from the
    /// side the front piece threatens ends the run; any other strike scores a
    /// point, restores some health and pulls a new piece onto the tower.
    ///
    /// Strikes from [`Side::None`] and strikes outside of `Ready`/`Playing`
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTowerError`] if the tower ran empty, which means the
    /// refill invariant was broken. The run is aborted without saving scores.
    pub fn strike(&mut self, side: Side) -> Result<StrikeOutcome, EmptyTowerError> {
        if !side.is_threatening() {
            tracing::debug!("ignoring strike without a side");
            return Ok(StrikeOutcome::Ignored);
        }
        match self.state {
            SessionState::Title | SessionState::GameOver => return Ok(StrikeOutcome::Ignored),
            SessionState::Ready => {
                self.state = SessionState::Playing;
                tracing::debug!("run started");
            }
            SessionState::Playing => {}
        }

        self.run_stats.strikes += 1;
        self.character_side = side;
        self.presenter.on_character_moved(side);

        let front = self.tower.front().map_err(|err| self.abort(err))?;
        if front.collides_with(side) {
            tracing::debug!(%side, "struck a threatening piece");
            self.presenter.on_tower_dropped();
            self.game_over();
            return Ok(StrikeOutcome::Collision);
        }

        self.tracker.apply_hit();
        self.presenter.on_score_changed(self.tracker.score());
        self.presenter
            .on_health_changed(self.tracker.health().value());

        let piece = self.tower.pop_front().map_err(|err| self.abort(err))?;
        self.presenter.on_piece_flipped(piece, side);
        self.tower.append_random(1);
        self.presenter.on_tower_dropped();

        Ok(StrikeOutcome::Hit)
    }

    /// Resolves a batch of strikes collected during one frame, in order.
    ///
    /// Stops at the first collision; the rest of the batch is dropped.
    /// Returns the number of hits.
    pub fn strike_all<I>(&mut self, sides: I) -> Result<usize, EmptyTowerError>
    where
        I: IntoIterator<Item = Side>,
    {
        let mut hits = 0;
        for side in sides {
            match self.strike(side)? {
                StrikeOutcome::Hit => hits += 1,
                StrikeOutcome::Collision => break,
                StrikeOutcome::Ignored => {}
            }
        }
        Ok(hits)
    }

    /// Advances one frame.
    ///
    /// While playing, drains a fixed amount of health per call regardless of
    /// `dt`; `dt` only feeds [`RunStats::elapsed`]. Ends the run when health
    /// drops below zero.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        if !self.state.is_playing() {
            return TickOutcome::Ignored;
        }

        self.run_stats.ticks += 1;
        self.run_stats.elapsed += dt;

        self.tracker.decay();
        self.presenter
            .on_health_changed(self.tracker.health().value());

        if self.tracker.is_depleted() {
            tracing::debug!("health depleted");
            self.game_over();
            return TickOutcome::Depleted;
        }
        TickOutcome::Decayed
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        self.presenter.on_game_over();

        let score = self.tracker.score();
        tracing::info!(
            score,
            high_score = self.scores.high_score,
            strikes = self.run_stats.strikes,
            ticks = self.run_stats.ticks,
            "game over"
        );

        if score > self.scores.high_score {
            self.persist(ScoreKey::HighScore, score);
        }
        self.persist(ScoreKey::LastScore, score);
        if let Err(err) = self.store.flush() {
            tracing::warn!(%err, "failed to flush scores");
        }
    }

    fn persist(&mut self, key: ScoreKey, value: usize) {
        if let Err(err) = self.store.write_int(key, value) {
            tracing::warn!(%key, value, %err, "failed to write score");
        }
    }

    fn abort(&mut self, err: EmptyTowerError) -> EmptyTowerError {
        tracing::error!(
            state = %self.state,
            score = self.tracker.score(),
            "{err}; aborting run"
        );
        self.state = SessionState::GameOver;
        err
    }
}
