//! Engine errors
//!
//! Illegal moves are not errors; they come back as `false` or a rejected
//! outcome. These variants cover caller bugs only.

use crate::board::Position;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),

    #[error("the game is over")]
    GameOver,

    #[error("round {0} is over; start the next round first")]
    RoundOver(u8),

    #[error("round {0} is still in progress")]
    RoundInProgress(u8),

    #[error("decision was computed for epoch {decided} but the game is at epoch {current}")]
    StaleDecision { decided: u64, current: u64 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
