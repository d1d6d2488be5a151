use super::board::Board;
use super::error::ChessError;
use super::moves::Move;
use super::piece::Color;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whose move it is, or `Ended` once the game is over. Kept separate from
/// [`Color`] so that "ended" can never be passed where a side is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    White,
    Black,
    Ended,
}

impl Turn {
    /// The side to move, or `None` for an ended game
    pub fn color(&self) -> Option<Color> {
        match self {
            Turn::White => Some(Color::White),
            Turn::Black => Some(Color::Black),
            Turn::Ended => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Turn::Ended)
    }
}

impl From<Color> for Turn {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Turn::White,
            Color::Black => Turn::Black,
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color() {
            Some(color) => write!(f, "{} to move", color),
            None => write!(f, "game over"),
        }
    }
}

/// Rules engine: one board plus the turn indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Turn,
}

impl Game {
    /// Standard starting position, White to move
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Turn::White,
        }
    }

    pub fn with_board(board: Board, turn: Turn) -> Self {
        Self { board, turn }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Mark the game as over; no further moves are accepted
    pub fn end(&mut self) {
        self.turn = Turn::Ended;
    }

    /// Pseudo-legal moves of the piece on `start` that do not leave its own king
    /// in check. Empty if the square is empty.
    pub fn legal_moves(&self, start: Position) -> Result<Vec<Move>, ChessError> {
        let Some(piece) = self.board.get_piece(start) else {
            return Ok(Vec::new());
        };

        let mut legal = Vec::new();
        for mv in piece.moves(&self.board, start) {
            let mut scratch = self.board.clone();
            scratch.apply_move(&mv);
            if !is_in_check_on(&scratch, piece.color)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    pub fn make_move(&mut self, mv: Move) -> Result<(), ChessError> {
        let piece = self.board.get_piece(mv.start).ok_or_else(|| {
            ChessError::illegal_move(format!("No piece at {}", mv.start))
        })?;

        let side = self
            .turn
            .color()
            .ok_or_else(|| ChessError::illegal_move("The game is over"))?;
        if piece.color != side {
            return Err(ChessError::illegal_move(format!(
                "Cannot move a {} piece when it is {}'s turn",
                piece.color.as_str(),
                side
            )));
        }

        if !self.legal_moves(mv.start)?.contains(&mv) {
            return Err(ChessError::illegal_move(format!("{} is not a legal move", mv)));
        }

        self.board.apply_move(&mv);
        self.turn = Turn::from(side.opposite());
        Ok(())
    }

    pub fn is_in_check(&self, color: Color) -> Result<bool, ChessError> {
        is_in_check_on(&self.board, color)
    }

    pub fn is_in_checkmate(&self, color: Color) -> Result<bool, ChessError> {
        Ok(self.is_in_check(color)? && !self.has_any_legal_move(color)?)
    }

    pub fn is_in_stalemate(&self, color: Color) -> Result<bool, ChessError> {
        Ok(!self.is_in_check(color)? && !self.has_any_legal_move(color)?)
    }

    fn has_any_legal_move(&self, color: Color) -> Result<bool, ChessError> {
        for (pos, piece) in self.board.pieces() {
            if piece.color == color && !self.legal_moves(pos)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether any enemy piece has a pseudo-legal move onto `color`'s king
fn is_in_check_on(board: &Board, color: Color) -> Result<bool, ChessError> {
    let king = board
        .find_king(color)
        .ok_or(ChessError::KingMissing(color))?;

    Ok(board
        .pieces()
        .filter(|(_, piece)| piece.color != color)
        .any(|(pos, piece)| piece.moves(board, pos).iter().any(|mv| mv.end == king)))
}
