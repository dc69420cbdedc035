use serde::{Deserialize, Serialize};

use super::side::Side;

/// A single sushi piece in the tower.
///
/// Pieces are plain values: they carry no identity beyond their position in
/// the [`Tower`](crate::Tower) that owns them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    side: Side,
}

impl Piece {
    /// The neutral piece the tower stands on.
    ///
    /// Never stored in the tower itself; it is consulted as the preceding
    /// piece when the tower is empty.
    pub const BASE: Self = Self::new(Side::None);

    #[must_use]
    pub const fn new(side: Side) -> Self {
        Self { side }
    }

    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    /// Returns `true` if striking from `side` while this piece is at the
    /// front of the tower ends the run.
    #[must_use]
    pub fn collides_with(self, side: Side) -> bool {
        side.is_threatening() && self.side == side
    }
}

impl From<Side> for Piece {
    fn from(side: Side) -> Self {
        Self::new(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_is_neutral() {
        assert_eq!(Piece::BASE.side(), Side::None);
    }

    #[test]
    fn test_collision_requires_matching_threat() {
        let piece = Piece::new(Side::Left);
        assert!(piece.collides_with(Side::Left));
        assert!(!piece.collides_with(Side::Right));
        assert!(!piece.collides_with(Side::None));
        assert!(!Piece::BASE.collides_with(Side::None));
    }
}
