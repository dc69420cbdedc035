use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Side;

/// Draws below this value produce a left piece.
const LEFT_THRESHOLD: f64 = 0.45;
/// Draws below this value (and not below [`LEFT_THRESHOLD`]) produce a right piece.
const RIGHT_THRESHOLD: f64 = 0.90;

/// Source of uniformly distributed values in `[0, 1)`.
///
/// The generator consumes randomness only through this trait, so tests can
/// substitute a [`ScriptedSource`] and production code a [`SeededSource`].
pub trait RandomSource: fmt::Debug {
    /// Returns the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Seed for deterministic tower generation.
///
/// 128 bits, written as a 32-character hexadecimal string both by
/// [`Display`](fmt::Display) and by serde. The same seed always produces the
/// same tower.
///
/// ```
/// use sushi_engine::TowerSeed;
///
/// let seed: TowerSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TowerSeed([u8; 16]);

impl TowerSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for TowerSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseTowerSeedError {
    #[display("invalid seed length: expected 32 hex characters, got {_0}")]
    InvalidLength(#[error(not(source))] usize),
    #[display("invalid seed: {_0:?} is not a hex number")]
    InvalidHex(#[error(not(source))] String),
}

impl FromStr for TowerSeed {
    type Err = ParseTowerSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseTowerSeedError::InvalidLength(s.len()));
        }
        // from_str_radix alone would also accept a leading sign
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseTowerSeedError::InvalidHex(s.into()));
        }
        let num =
            u128::from_str_radix(s, 16).map_err(|_| ParseTowerSeedError::InvalidHex(s.into()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for TowerSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TowerSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<TowerSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> TowerSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        TowerSeed(seed)
    }
}

/// [`RandomSource`] backed by a PCG generator.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: Pcg32,
}

impl SeededSource {
    #[must_use]
    pub fn new(seed: TowerSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.random()
    }
}

/// [`RandomSource`] that replays a fixed list of values, cycling forever.
///
/// ```
/// use sushi_engine::{RandomSource as _, ScriptedSource};
///
/// let mut source = ScriptedSource::new([0.1, 0.5]);
/// assert_eq!(source.next_unit(), 0.1);
/// assert_eq!(source.next_unit(), 0.5);
/// assert_eq!(source.next_unit(), 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// # Panics
    ///
    /// Panics if `values` is empty or holds a value outside `[0, 1)`.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "scripted source needs at least one value");
        assert!(
            values.iter().all(|v| (0.0..1.0).contains(v)),
            "scripted values must lie in [0, 1)"
        );
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far.
    #[must_use]
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// Decides the side of each new tower piece.
///
/// A threatening piece (left or right) is always followed by a neutral one,
/// so the player can never face two threats in a row. After a neutral piece
/// the next side is drawn at random:
///
/// | draw          | side  |
/// |---------------|-------|
/// | `[0.0, 0.45)` | left  |
/// | `[0.45, 0.9)` | right |
/// | `[0.9, 1.0)`  | none  |
#[derive(Debug)]
pub struct PieceGenerator {
    source: Box<dyn RandomSource>,
}

impl PieceGenerator {
    /// Creates a generator with a random seed from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic.
    #[must_use]
    pub fn with_seed(seed: TowerSeed) -> Self {
        Self::with_source(SeededSource::new(seed))
    }

    #[must_use]
    pub fn with_source<R>(source: R) -> Self
    where
        R: RandomSource + 'static,
    {
        Self {
            source: Box::new(source),
        }
    }

    /// Returns the side of the piece to place on top of a piece with
    /// `preceding_side`.
    ///
    /// No random value is consumed when `preceding_side` is threatening.
    pub fn generate(&mut self, preceding_side: Side) -> Side {
        if preceding_side.is_threatening() {
            return Side::None;
        }
        let r = self.source.next_unit();
        if r < LEFT_THRESHOLD {
            Side::Left
        } else if r < RIGHT_THRESHOLD {
            Side::Right
        } else {
            Side::None
        }
    }
}

impl Default for PieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
