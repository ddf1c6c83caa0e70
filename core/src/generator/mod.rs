use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate(self) -> Board;
}

/// A ready-made layout generates itself, used for scripted games.
impl BoardGenerator for Board {
    fn generate(self) -> Board {
        self
    }
}
