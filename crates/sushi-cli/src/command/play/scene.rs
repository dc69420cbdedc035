use sushi_engine::{Piece, PresentationEvent, ScoreBoard, Side};

/// Frames a knocked-off piece stays visible while flying away.
pub(crate) const FLIGHT_FRAMES: u8 = 12;
/// Frames the tower is drawn one row higher after a piece was removed.
pub(crate) const DROP_FRAMES: u8 = 3;

/// A piece flying off the tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flight {
    pub(crate) piece: Piece,
    /// Side it was struck from; it flies the other way.
    pub(crate) struck_from: Side,
    pub(crate) frames_left: u8,
}

impl Flight {
    /// Horizontal distance travelled so far, in cells.
    pub(crate) fn distance(self) -> u16 {
        u16::from(FLIGHT_FRAMES - self.frames_left) * 2
    }
}

/// What the terminal shows, rebuilt from presentation events.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Scene {
    health: f64,
    score: usize,
    scores: ScoreBoard,
    mat_visible: bool,
    game_over: bool,
    flights: Vec<Flight>,
    drop_frames: u8,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            health: 1.0,
            score: 0,
            scores: ScoreBoard::default(),
            mat_visible: false,
            game_over: false,
            flights: Vec::new(),
            drop_frames: 0,
        }
    }
}

impl Scene {
    pub(crate) fn health(&self) -> f64 {
        self.health
    }

    pub(crate) fn score(&self) -> usize {
        self.score
    }

    pub(crate) fn scores(&self) -> ScoreBoard {
        self.scores
    }

    pub(crate) fn is_mat_visible(&self) -> bool {
        self.mat_visible
    }

    pub(crate) fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub(crate) fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub(crate) fn is_dropping(&self) -> bool {
        self.drop_frames > 0
    }

    pub(crate) fn apply(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::HealthChanged(value) => self.health = value,
            PresentationEvent::ScoreChanged(score) => self.score = score,
            PresentationEvent::PieceFlipped { piece, direction } => self.flights.push(Flight {
                piece,
                struck_from: direction,
                frames_left: FLIGHT_FRAMES,
            }),
            PresentationEvent::TowerDropped => {
                if !self.game_over {
                    self.drop_frames = DROP_FRAMES;
                }
            }
            PresentationEvent::GameOver => self.game_over = true,
            PresentationEvent::MatShown => self.mat_visible = true,
            PresentationEvent::MatHidden => self.mat_visible = false,
            // a new run is being set up
            PresentationEvent::ScoresLoaded(scores) => {
                self.scores = scores;
                self.game_over = false;
                self.flights.clear();
                self.drop_frames = 0;
            }
            PresentationEvent::CharacterMoved(_) => {}
        }
    }

    /// Advances animations by one frame.
    pub(crate) fn advance(&mut self) {
        self.drop_frames = self.drop_frames.saturating_sub(1);
        for flight in &mut self.flights {
            flight.frames_left = flight.frames_left.saturating_sub(1);
        }
        self.flights.retain(|flight| flight.frames_left > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flipped(direction: Side) -> PresentationEvent {
        PresentationEvent::PieceFlipped {
            piece: Piece::BASE,
            direction,
        }
    }

    #[test]
    fn test_flight_lasts_its_frames() {
        let mut scene = Scene::default();
        scene.apply(flipped(Side::Left));
        assert_eq!(scene.flights()[0].distance(), 0);

        scene.advance();
        assert_eq!(scene.flights()[0].distance(), 2);

        for _ in 1..FLIGHT_FRAMES {
            scene.advance();
        }
        assert!(scene.flights().is_empty());
    }

    #[test]
    fn test_drop_animation() {
        let mut scene = Scene::default();
        scene.apply(PresentationEvent::TowerDropped);
        assert!(scene.is_dropping());
        for _ in 0..DROP_FRAMES {
            scene.advance();
        }
        assert!(!scene.is_dropping());
    }

    #[test]
    fn test_no_drop_after_game_over() {
        let mut scene = Scene::default();
        scene.apply(PresentationEvent::GameOver);
        scene.apply(PresentationEvent::TowerDropped);
        assert!(scene.is_game_over());
        assert!(!scene.is_dropping());
    }

    #[test]
    fn test_scores_loaded_starts_new_run() {
        let mut scene = Scene::default();
        scene.apply(flipped(Side::Right));
        scene.apply(PresentationEvent::ScoreChanged(3));
        scene.apply(PresentationEvent::GameOver);

        let scores = ScoreBoard {
            high_score: 3,
            last_score: 3,
        };
        scene.apply(PresentationEvent::ScoresLoaded(scores));
        scene.apply(PresentationEvent::ScoreChanged(0));
        scene.apply(PresentationEvent::MatShown);

        assert!(!scene.is_game_over());
        assert!(scene.flights().is_empty());
        assert!(scene.is_mat_visible());
        assert_eq!(scene.score(), 0);
        assert_eq!(scene.scores(), scores);
    }

    #[test]
    fn test_mat_visibility() {
        let mut scene = Scene::default();
        assert!(!scene.is_mat_visible());
        scene.apply(PresentationEvent::MatShown);
        assert!(scene.is_mat_visible());
        scene.apply(PresentationEvent::MatHidden);
        assert!(!scene.is_mat_visible());
        scene.apply(PresentationEvent::HealthChanged(0.5));
        assert!((scene.health() - 0.5).abs() < f64::EPSILON);
    }
}
