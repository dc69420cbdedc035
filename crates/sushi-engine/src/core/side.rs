use serde::{Deserialize, Serialize};

/// Which hand position a piece threatens, or which side the player strikes.
///
/// A piece with [`Side::Left`] has its chopsticks sticking out on the left,
/// so striking from the left while it is at the front of the tower ends the
/// run. [`Side::None`] marks a neutral piece that is safe from both sides.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Side {
    #[display("left")]
    Left,
    #[display("right")]
    Right,
    #[default]
    #[display("none")]
    None,
}

impl Side {
    /// Returns `true` for [`Side::Left`] and [`Side::Right`].
    #[must_use]
    pub const fn is_threatening(self) -> bool {
        !matches!(self, Side::None)
    }

    /// Returns the side opposite to `self`.
    ///
    /// [`Side::None`] has no opposite and maps to itself.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::None => Side::None,
        }
    }
}
