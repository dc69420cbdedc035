use std::{collections::HashMap, convert::Infallible, error::Error};

use serde::{Deserialize, Serialize};

/// Keys under which scores are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ScoreKey {
    #[display("highscore")]
    HighScore,
    #[display("lastScore")]
    LastScore,
}

impl ScoreKey {
    /// Storage key string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighScore => "highscore",
            Self::LastScore => "lastScore",
        }
    }
}

/// Durable storage for the best and most recent score.
///
/// The session reads both scores when a run is set up and writes them only
/// when a run ends, followed by one [`flush`](Self::flush). Failures never
/// interrupt the game: failed reads count as 0 and failed writes are logged.
pub trait ScoreStore {
    type Error: Error;

    /// Returns the stored value, or `None` if the key was never written.
    fn read_int(&mut self, key: ScoreKey) -> Result<Option<usize>, Self::Error>;

    fn write_int(&mut self, key: ScoreKey, value: usize) -> Result<(), Self::Error>;

    /// Makes previous writes durable.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl<S> ScoreStore for &mut S
where
    S: ScoreStore + ?Sized,
{
    type Error = S::Error;

    fn read_int(&mut self, key: ScoreKey) -> Result<Option<usize>, Self::Error> {
        (**self).read_int(key)
    }

    fn write_int(&mut self, key: ScoreKey, value: usize) -> Result<(), Self::Error> {
        (**self).write_int(key, value)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// High score and last score as shown on the title mat.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub high_score: usize,
    pub last_score: usize,
}

impl ScoreBoard {
    /// Reads both scores, treating missing or unreadable values as 0.
    #[must_use]
    pub fn load<S>(store: &mut S) -> Self
    where
        S: ScoreStore + ?Sized,
    {
        Self {
            high_score: read_or_zero(store, ScoreKey::HighScore),
            last_score: read_or_zero(store, ScoreKey::LastScore),
        }
    }
}

fn read_or_zero<S>(store: &mut S, key: ScoreKey) -> usize
where
    S: ScoreStore + ?Sized,
{
    match store.read_int(key) {
        Ok(value) => value.unwrap_or(0),
        Err(err) => {
            tracing::warn!(%key, %err, "failed to read score, using 0");
            0
        }
    }
}

/// In-memory [`ScoreStore`], for tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    values: HashMap<ScoreKey, usize>,
    flushes: usize,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_scores(scores: ScoreBoard) -> Self {
        let mut store = Self::new();
        store.values.insert(ScoreKey::HighScore, scores.high_score);
        store.values.insert(ScoreKey::LastScore, scores.last_score);
        store
    }

    #[must_use]
    pub fn get(&self, key: ScoreKey) -> Option<usize> {
        self.values.get(&key).copied()
    }

    /// Number of times [`ScoreStore::flush`] was called.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl ScoreStore for MemoryScoreStore {
    type Error = Infallible;

    fn read_int(&mut self, key: ScoreKey) -> Result<Option<usize>, Self::Error> {
        Ok(self.get(key))
    }

    fn write_int(&mut self, key: ScoreKey, value: usize) -> Result<(), Self::Error> {
        self.values.insert(key, value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("storage unavailable")]
    struct Unavailable;

    #[derive(Debug)]
    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        type Error = Unavailable;

        fn read_int(&mut self, _key: ScoreKey) -> Result<Option<usize>, Self::Error> {
            Err(Unavailable)
        }

        fn write_int(&mut self, _key: ScoreKey, _value: usize) -> Result<(), Self::Error> {
            Err(Unavailable)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Err(Unavailable)
        }
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(ScoreKey::HighScore.as_str(), "highscore");
        assert_eq!(ScoreKey::LastScore.as_str(), "lastScore");
        assert_eq!(ScoreKey::LastScore.to_string(), "lastScore");
    }

    #[test]
    fn test_load_defaults_missing_keys_to_zero() {
        let mut store = MemoryScoreStore::new();
        assert_eq!(ScoreBoard::load(&mut store), ScoreBoard::default());
    }

    #[test]
    fn test_load_defaults_read_errors_to_zero() {
        assert_eq!(ScoreBoard::load(&mut BrokenStore), ScoreBoard::default());
    }

    #[test]
    fn test_borrowed_store_writes_through() {
        fn save_high_score<S: ScoreStore>(mut store: S) {
            store.write_int(ScoreKey::HighScore, 5).unwrap();
            store.flush().unwrap();
        }

        let mut store = MemoryScoreStore::new();
        save_high_score(&mut store);
        assert_eq!(store.get(ScoreKey::HighScore), Some(5));
        assert_eq!(store.flushes(), 1);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryScoreStore::with_scores(ScoreBoard {
            high_score: 9,
            last_score: 4,
        });
        store.write_int(ScoreKey::LastScore, 7).unwrap();
        store.flush().unwrap();
        assert_eq!(
            ScoreBoard::load(&mut store),
            ScoreBoard {
                high_score: 9,
                last_score: 7
            }
        );
        assert_eq!(store.flushes(), 1);
    }
}
