use super::board::Board;
use super::error::ChessError;
use super::movegen;
use super::moves::Move;
use super::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Opposite color
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction this color's pawns advance in
    pub(crate) fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub(crate) fn pawn_home_row(&self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    pub(crate) fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl FromStr for Color {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            _ => Err(ChessError::InvalidNotation(format!(
                "Expected 'white' or 'black', got '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Promotion choices in the order pawn moves are expanded
    pub const PROMOTIONS: [PieceType; 4] = [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ];

    /// Lowercase letter used in move notation (`e7e8=q`)
    pub fn notation_char(&self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation_char().to_ascii_uppercase())
    }
}

impl FromStr for PieceType {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "P" | "PAWN" => Ok(PieceType::Pawn),
            "R" | "ROOK" => Ok(PieceType::Rook),
            "N" | "KNIGHT" => Ok(PieceType::Knight),
            "B" | "BISHOP" => Ok(PieceType::Bishop),
            "Q" | "QUEEN" => Ok(PieceType::Queen),
            "K" | "KING" => Ok(PieceType::King),
            _ => Err(ChessError::InvalidPieceType(format!(
                "Expected one of: P, R, N, B, Q, K, got '{}'",
                s
            ))),
        }
    }
}

/// A piece is identified by color and type only; the board supplies its square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Self {
        Self { color, piece_type }
    }

    /// Every pseudo-legal move for this piece standing on `from`. Self-check is
    /// not considered; see [`crate::chess::Game::legal_moves`] for that.
    pub fn moves(&self, board: &Board, from: Position) -> Vec<Move> {
        let color = self.color;
        match self.piece_type {
            PieceType::Rook => movegen::ray_moves(board, from, color, &movegen::ORTHOGONAL, None),
            PieceType::Bishop => movegen::ray_moves(board, from, color, &movegen::DIAGONAL, None),
            PieceType::Queen => movegen::ray_moves(board, from, color, &movegen::ALL_RAYS, None),
            PieceType::King => movegen::ray_moves(board, from, color, &movegen::ALL_RAYS, Some(1)),
            PieceType::Knight => movegen::step_moves(board, from, color, &movegen::KNIGHT_OFFSETS),
            PieceType::Pawn => movegen::pawn_moves(board, from, color),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self.color {
            Color::White => self.piece_type.notation_char().to_ascii_uppercase(),
            Color::Black => self.piece_type.notation_char(),
        };
        write!(f, "{}", c)
    }
}
