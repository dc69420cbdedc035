use std::fmt;

/// Player health, stored in exact hundredths.
///
/// Health is capped at [`Health::FULL`] (1.0) but has no lower bound: any
/// value below zero means the player has run out. Hundredths keep the
/// per-tick decay and per-hit bonus exact, so a bar at 0.05 runs out on
/// precisely the sixth tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Health(i32);

impl Health {
    pub const FULL: Self = Self(100);
    pub const EMPTY: Self = Self(0);

    /// Restored by every successful strike.
    const HIT_BONUS: i32 = 10;
    /// Lost on every tick while playing.
    const DECAY_PER_TICK: i32 = 1;

    #[must_use]
    pub const fn from_hundredths(hundredths: i32) -> Self {
        Self(hundredths)
    }

    #[must_use]
    pub const fn hundredths(self) -> i32 {
        self.0
    }

    /// Health as a fraction of a full bar (1.0 = full).
    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Health {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

/// Health and score of the current run.
///
/// The tracker only does the arithmetic; the session notifies presentation
/// after each mutation.
///
/// ```
/// use sushi_engine::{Health, Tracker};
///
/// let mut tracker = Tracker::new();
/// tracker.decay();
/// assert_eq!(tracker.health(), Health::from_hundredths(99));
///
/// tracker.apply_hit();
/// assert_eq!(tracker.score(), 1);
/// assert_eq!(tracker.health(), Health::FULL);
/// ```
#[derive(Debug, Clone)]
pub struct Tracker {
    health: Health,
    score: usize,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    /// Creates a tracker with a full health bar and no score.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_health(Health::FULL)
    }

    /// Creates a tracker with no score and the given health, clamped to
    /// [`Health::FULL`].
    #[must_use]
    pub const fn with_health(health: Health) -> Self {
        let hundredths = if health.0 > Health::FULL.0 {
            Health::FULL.0
        } else {
            health.0
        };
        Self {
            health: Health(hundredths),
            score: 0,
        }
    }

    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Records a successful strike: one point and a tenth of a bar of health.
    pub fn apply_hit(&mut self) {
        self.score += 1;
        self.health = Health((self.health.0 + Health::HIT_BONUS).min(Health::FULL.0));
    }

    /// Drains one tick's worth of health.
    pub fn decay(&mut self) {
        self.health = Health(self.health.0 - Health::DECAY_PER_TICK);
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health.is_depleted()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
