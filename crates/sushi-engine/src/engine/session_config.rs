use serde::{Deserialize, Serialize};

use super::{piece_generator::TowerSeed, tower::DEFAULT_OPENING_RANDOM_PIECES};

/// State a session enters when play is pressed after a game over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartState {
    /// Show the title mat again; another press is needed to get ready.
    #[default]
    Title,
    /// Skip the title and wait for the first strike.
    Ready,
}

/// Tunables of a [`GameSession`](super::GameSession).
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// use sushi_engine::{RestartState, SessionConfig};
///
/// let config: SessionConfig = serde_json::from_str(r#"{ "restart_state": "ready" }"#).unwrap();
/// assert_eq!(config.restart_state, RestartState::Ready);
/// assert_eq!(config.opening_random_pieces, 10);
/// assert!(config.seed.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Random pieces stacked on the two fixed opening pieces.
    pub opening_random_pieces: usize,
    pub restart_state: RestartState,
    /// Seed of the piece generator; random when absent.
    pub seed: Option<TowerSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            opening_random_pieces: DEFAULT_OPENING_RANDOM_PIECES,
            restart_state: RestartState::default(),
            seed: None,
        }
    }
}
