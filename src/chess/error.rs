use super::piece::Color;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("Invalid coordinate: row {row}, column {column} (both must be 1-8)")]
    InvalidCoordinate { row: i8, column: i8 },

    #[error("Invalid piece type: {0}")]
    InvalidPieceType(String),

    #[error("Invalid move notation: {0}")]
    InvalidNotation(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Only reachable from a corrupted board; never a user error.
    #[error("No {0} king on the board")]
    KingMissing(Color),
}

impl ChessError {
    pub fn illegal_move(msg: impl Into<String>) -> Self {
        ChessError::IllegalMove(msg.into())
    }

    /// Whether this error is the client's fault and can be retried with a corrected command
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ChessError::KingMissing(_))
    }
}
