use std::collections::VecDeque;

use crate::{EmptyTowerError, Piece, Side};

use super::piece_generator::PieceGenerator;

/// Number of random pieces placed on top of the fixed opening pieces.
pub const DEFAULT_OPENING_RANDOM_PIECES: usize = 10;

/// Sides of the pieces every tower opens with, bottom-most first.
const OPENING_SIDES: [Side; 2] = [Side::None, Side::Right];

/// The stack of sushi pieces the player resolves from the bottom up.
///
/// The front of the tower is the piece resting on the base, i.e. the next
/// piece to be struck; the back is the most recently added piece.
///
/// The tower owns its [`PieceGenerator`] and consults it whenever it is
/// refilled, so no threatening piece is ever appended directly on top of
/// another threatening piece.
///
/// # Example
///
/// ```
/// use sushi_engine::{PieceGenerator, Side, Tower};
///
/// let mut tower = Tower::opening(PieceGenerator::new(), 10);
/// assert_eq!(tower.len(), 12);
/// assert_eq!(tower.front().unwrap().side(), Side::None);
///
/// let piece = tower.pop_front().unwrap();
/// tower.append_random(1);
/// assert_eq!(piece.side(), Side::None);
/// assert_eq!(tower.front().unwrap().side(), Side::Right);
/// ```
#[derive(Debug)]
pub struct Tower {
    pieces: VecDeque<Piece>,
    generator: PieceGenerator,
}

impl Tower {
    /// Creates an empty tower.
    #[must_use]
    pub fn new(generator: PieceGenerator) -> Self {
        Self {
            pieces: VecDeque::new(),
            generator,
        }
    }

    /// Creates the tower a run starts with: a neutral piece, a right piece,
    /// then `random_pieces` generated pieces.
    #[must_use]
    pub fn opening(generator: PieceGenerator, random_pieces: usize) -> Self {
        let mut tower = Self::new(generator);
        for side in OPENING_SIDES {
            tower.append_piece(side);
        }
        tower.append_random(random_pieces);
        tower
    }

    /// Replaces the contents with a fresh opening tower, keeping the
    /// generator (and thus its random stream).
    pub fn reset(&mut self, random_pieces: usize) {
        self.pieces.clear();
        for side in OPENING_SIDES {
            self.append_piece(side);
        }
        self.append_random(random_pieces);
    }

    /// Appends a piece with the given side at the back of the tower.
    pub fn append_piece(&mut self, side: Side) {
        self.pieces.push_back(Piece::new(side));
    }

    /// Appends `count` generated pieces.
    ///
    /// Each new side is derived from the current back piece, or from
    /// [`Piece::BASE`] when the tower is empty.
    pub fn append_random(&mut self, count: usize) {
        for _ in 0..count {
            let preceding = self.pieces.back().copied().unwrap_or(Piece::BASE);
            let side = self.generator.generate(preceding.side());
            self.append_piece(side);
        }
    }

    /// Returns the piece about to be resolved.
    pub fn front(&self) -> Result<Piece, EmptyTowerError> {
        self.pieces.front().copied().ok_or(EmptyTowerError)
    }

    /// Removes and returns the piece about to be resolved.
    pub fn pop_front(&mut self) -> Result<Piece, EmptyTowerError> {
        self.pieces.pop_front().ok_or(EmptyTowerError)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Iterates over the pieces from the front (next to resolve) to the back.
    #[must_use]
    pub fn pieces(&self) -> impl ExactSizeIterator<Item = Piece> + DoubleEndedIterator + '_ {
        self.pieces.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptedSource, TowerSeed};

    fn scripted(values: &[f64]) -> PieceGenerator {
        PieceGenerator::with_source(ScriptedSource::new(values))
    }

    fn sides(tower: &Tower) -> Vec<Side> {
        tower.pieces().map(Piece::side).collect()
    }

    fn assert_no_double_threat(tower: &Tower) {
        let sides = sides(tower);
        for pair in sides.windows(2) {
            assert!(
                !(pair[0].is_threatening() && pair[1].is_threatening()),
                "adjacent threats in {sides:?}"
            );
        }
    }

    #[test]
    fn test_opening_tower_layout() {
        let tower = Tower::opening(scripted(&[0.1]), DEFAULT_OPENING_RANDOM_PIECES);
        assert_eq!(tower.len(), 12);
        assert_eq!(
            sides(&tower),
            [
                Side::None,
                Side::Right,
                Side::None,
                Side::Left,
                Side::None,
                Side::Left,
                Side::None,
                Side::Left,
                Side::None,
                Side::Left,
                Side::None,
                Side::Left,
            ]
        );
    }

    #[test]
    fn test_opening_front_is_neutral_for_any_seed() {
        for i in 0..64_u8 {
            let tower = Tower::opening(
                PieceGenerator::with_seed(TowerSeed::from_bytes([i; 16])),
                DEFAULT_OPENING_RANDOM_PIECES,
            );
            assert_eq!(tower.front().unwrap().side(), Side::None);
        }
    }

    #[test]
    fn test_append_random_on_empty_tower_uses_base() {
        let mut tower = Tower::new(scripted(&[0.5]));
        tower.append_random(1);
        assert_eq!(sides(&tower), [Side::Right]);
    }

    #[test]
    fn test_append_random_never_stacks_threats() {
        for i in 0..64_u8 {
            let mut tower = Tower::new(PieceGenerator::with_seed(TowerSeed::from_bytes([i; 16])));
            tower.append_piece(Side::Left);
            for count in [1, 3, 7, 20] {
                tower.append_random(count);
                assert_no_double_threat(&tower);
            }
        }
    }

    #[test]
    fn test_pop_and_refill_keeps_invariants() {
        let mut tower = Tower::opening(
            PieceGenerator::with_seed(TowerSeed::from_bytes([42; 16])),
            DEFAULT_OPENING_RANDOM_PIECES,
        );
        for _ in 0..500 {
            tower.pop_front().unwrap();
            tower.append_random(1);
            assert_eq!(tower.len(), 12);
            assert_no_double_threat(&tower);
        }
    }

    #[test]
    fn test_front_and_pop_on_empty_tower_fail() {
        let mut tower = Tower::new(scripted(&[0.1]));
        assert!(tower.is_empty());
        assert_eq!(tower.front(), Err(EmptyTowerError));
        assert_eq!(tower.pop_front(), Err(EmptyTowerError));
    }

    #[test]
    fn test_front_does_not_remove() {
        let mut tower = Tower::new(scripted(&[0.1]));
        tower.append_piece(Side::Right);
        tower.append_piece(Side::None);
        assert_eq!(tower.front().unwrap().side(), Side::Right);
        assert_eq!(tower.len(), 2);
        assert_eq!(tower.pop_front().unwrap().side(), Side::Right);
        assert_eq!(tower.front().unwrap().side(), Side::None);
    }

    #[test]
    fn test_reset_restores_opening_pieces() {
        let mut tower = Tower::new(scripted(&[0.95]));
        tower.append_piece(Side::Left);
        tower.reset(3);
        assert_eq!(
            sides(&tower),
            [Side::None, Side::Right, Side::None, Side::None, Side::None]
        );
    }
}
