use crate::{Piece, Side};

use super::score_store::ScoreBoard;

/// Receiver of presentation notifications.
///
/// The session calls these after the corresponding state change has been
/// applied. Every method defaults to doing nothing, so hosts only override
/// what they draw or animate.
pub trait Presenter {
    /// Health changed; `value` is the new fraction of a full bar.
    fn on_health_changed(&mut self, _value: f64) {}

    fn on_score_changed(&mut self, _score: usize) {}

    /// The character turned to face `side` before striking.
    fn on_character_moved(&mut self, _side: Side) {}

    /// `piece` was knocked off the tower towards `direction`.
    fn on_piece_flipped(&mut self, _piece: Piece, _direction: Side) {}

    /// The remaining tower slides down by one piece.
    fn on_tower_dropped(&mut self) {}

    /// The run ended; tower and character turn red.
    fn on_game_over(&mut self) {}

    /// The title mat (with play button and scores) is lowered.
    fn on_mat_shown(&mut self) {}

    /// The title mat is pulled away.
    fn on_mat_hidden(&mut self) {}

    /// Stored scores were read for display on the mat.
    fn on_scores_loaded(&mut self, _scores: ScoreBoard) {}
}

/// Ignores all notifications.
impl Presenter for () {}

/// One recorded presentation notification.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum PresentationEvent {
    HealthChanged(f64),
    ScoreChanged(usize),
    CharacterMoved(Side),
    PieceFlipped { piece: Piece, direction: Side },
    TowerDropped,
    GameOver,
    MatShown,
    MatHidden,
    ScoresLoaded(ScoreBoard),
}

/// [`Presenter`] that records every notification in order.
///
/// Hosts that animate at their own pace drain the log once per frame with
/// [`EventLog::drain`].
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<PresentationEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[PresentationEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PresentationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for EventLog {
    fn on_health_changed(&mut self, value: f64) {
        self.events.push(PresentationEvent::HealthChanged(value));
    }

    fn on_score_changed(&mut self, score: usize) {
        self.events.push(PresentationEvent::ScoreChanged(score));
    }

    fn on_character_moved(&mut self, side: Side) {
        self.events.push(PresentationEvent::CharacterMoved(side));
    }

    fn on_piece_flipped(&mut self, piece: Piece, direction: Side) {
        self.events
            .push(PresentationEvent::PieceFlipped { piece, direction });
    }

    fn on_tower_dropped(&mut self) {
        self.events.push(PresentationEvent::TowerDropped);
    }

    fn on_game_over(&mut self) {
        self.events.push(PresentationEvent::GameOver);
    }

    fn on_mat_shown(&mut self) {
        self.events.push(PresentationEvent::MatShown);
    }

    fn on_mat_hidden(&mut self) {
        self.events.push(PresentationEvent::MatHidden);
    }

    fn on_scores_loaded(&mut self, scores: ScoreBoard) {
        self.events.push(PresentationEvent::ScoresLoaded(scores));
    }
}
