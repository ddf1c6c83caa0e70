use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board layout must hold every symbol exactly twice on a 4x4 grid")]
    InvalidLayout,
    #[error("Mistake limit must be at least one")]
    InvalidConfig,
}

pub type Result<T> = core::result::Result<T, GameError>;
