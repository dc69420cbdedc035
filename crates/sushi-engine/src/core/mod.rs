pub use self::{piece::*, side::*};

pub(crate) mod piece;
pub(crate) mod side;
