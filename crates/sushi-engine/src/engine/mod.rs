//! Game logic built on the [`core`](crate::core) values.
//!
//! - [`GameSession`] - state machine driven by play, strike and tick inputs
//! - [`Tower`] - ordered pieces, refilled through a [`PieceGenerator`]
//! - [`PieceGenerator`] - picks new sides, never stacking two threats
//! - [`Tracker`] - health bar and score of the current run
//! - [`ScoreStore`] - gateway to the persisted high and last score
//! - [`Presenter`] - receiver of presentation notifications
//! - [`SessionConfig`] - tunables, loadable with serde
//!
//! # Run Flow
//!
//! 1. Create a [`GameSession`]; it reads the stored scores and shows the title mat
//! 2. [`GameSession::press_play`] gets the player ready
//! 3. The first [`GameSession::strike`] starts the run
//! 4. Every frame, [`GameSession::tick`] drains health
//! 5. A strike into a threatening piece, or an empty health bar, ends the run
//!    and saves the scores
//! 6. [`GameSession::press_play`] sets up a fresh run
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use sushi_engine::{
//!     EventLog, GameSession, MemoryScoreStore, ScoreKey, SessionConfig, SessionState, Side,
//! };
//!
//! let mut session = GameSession::new(SessionConfig::default(), MemoryScoreStore::new(), EventLog::new());
//! session.press_play();
//!
//! while session.state() != SessionState::GameOver {
//!     session.tick(Duration::from_millis(16));
//!     // Always strike into the side the front piece threatens.
//!     let front = session.tower().front().unwrap();
//!     let side = if front.side() == Side::None { Side::Left } else { front.side() };
//!     session.strike(side).unwrap();
//! }
//!
//! assert!(session.store().get(ScoreKey::LastScore).is_some());
//! ```

pub use self::{
    game_session::*, piece_generator::*, presenter::*, score_store::*, session_config::*,
    tower::*, tracker::*,
};

mod game_session;
mod piece_generator;
mod presenter;
mod score_store;
mod session_config;
mod tower;
mod tracker;
