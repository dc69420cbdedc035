//! Logic core of a one-button-per-hand sushi tower game.
//!
//! The player knocks pieces off the bottom of a sushi tower by striking from
//! the left or the right. Pieces with chopsticks sticking out on the struck
//! side end the run, and a health bar drains every frame unless the player
//! keeps striking.
//!
//! - [`core`] - plain values: [`Side`] and [`Piece`]
//! - [`engine`] - the tower, its generator, health/score tracking and the
//!   [`GameSession`] state machine with its collaborators

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// The tower ran out of pieces while a run was in progress.
///
/// The session refills the tower after every removal, so this signals a
/// broken invariant rather than a game event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("tower is empty")]
pub struct EmptyTowerError;
