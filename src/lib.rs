pub mod chess;
pub mod cli;
pub mod messages;
pub mod network;
pub mod session;
pub mod storage;

// Re-export key types for easy testing
pub use chess::{Board, ChessError, Color, Game, Move, Piece, PieceType, Position, Turn};
pub use messages::{ClientCommand, CommandType, ServerMessage};
pub use network::{Client, Connection, Server};
pub use session::{SessionHandler, SessionRegistry};
pub use storage::{AuthStore, Database, GameId, GameRecord, GameStore, MemoryStore};
