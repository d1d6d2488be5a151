use super::moves::Move;
use super::piece::{Color, Piece, PieceType};
use super::position::Position;
use serde::{Deserialize, Serialize};

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Fixed 8x8 grid of optional pieces.
///
/// `Clone` is a deep copy: the rules engine simulates candidate moves on a
/// clone and discards it, leaving the authoritative board untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// squares[row - 1][column - 1]
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// Create a new board with the standard starting position
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.reset();
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    pub fn get_piece(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row() as usize - 1][pos.column() as usize - 1]
    }

    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        self.squares[pos.row() as usize - 1][pos.column() as usize - 1] = piece;
    }

    /// Move whatever stands on the start square to the end square, replacing it
    /// with the promotion piece if one is given. Returns the captured piece.
    ///
    /// No rules are checked here; that is [`crate::chess::Game::make_move`]'s job.
    pub fn apply_move(&mut self, mv: &Move) -> Option<Piece> {
        let piece = self.get_piece(mv.start)?;
        let placed = match mv.promotion {
            Some(piece_type) => Piece::new(piece.color, piece_type),
            None => piece,
        };
        let captured = self.get_piece(mv.end);
        self.set_piece(mv.start, None);
        self.set_piece(mv.end, Some(placed));
        captured
    }

    /// Set up the standard chess starting position
    pub fn reset(&mut self) {
        self.squares = [[None; 8]; 8];

        for (color, back_row, pawn_row) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
            for (column, &piece_type) in BACK_RANK.iter().enumerate() {
                self.squares[back_row][column] = Some(Piece::new(color, piece_type));
                self.squares[pawn_row][column] = Some(Piece::new(color, PieceType::Pawn));
            }
        }
    }

    /// Every occupied square with its piece
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(|pos| self.get_piece(pos).map(|piece| (pos, piece)))
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceType::King);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(pos, _)| pos)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
