pub use self::board::Board;
pub use self::error::ChessError;
pub use self::game::{Game, Turn};
pub use self::moves::Move;
pub use self::piece::{Color, Piece, PieceType};
pub use self::position::Position;

mod board;
mod error;
mod game;
pub mod movegen;
mod moves;
mod piece;
mod position;
