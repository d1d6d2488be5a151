use crate::chess::Move;
use crate::storage::{GameId, GameRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Connect,
    MakeMove,
    Leave,
    Resign,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandType::Connect => write!(f, "CONNECT"),
            CommandType::MakeMove => write!(f, "MAKE_MOVE"),
            CommandType::Leave => write!(f, "LEAVE"),
            CommandType::Resign => write!(f, "RESIGN"),
        }
    }
}

/// Inbound command envelope. `chess_move` is only meaningful for `MakeMove`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientCommand {
    pub command_type: CommandType,
    pub auth_token: String,
    pub game_id: GameId,
    pub chess_move: Option<Move>,
}

impl ClientCommand {
    pub fn connect(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::without_move(CommandType::Connect, auth_token, game_id)
    }

    pub fn make_move(auth_token: impl Into<String>, game_id: GameId, chess_move: Move) -> Self {
        Self {
            command_type: CommandType::MakeMove,
            auth_token: auth_token.into(),
            game_id,
            chess_move: Some(chess_move),
        }
    }

    pub fn leave(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::without_move(CommandType::Leave, auth_token, game_id)
    }

    pub fn resign(auth_token: impl Into<String>, game_id: GameId) -> Self {
        Self::without_move(CommandType::Resign, auth_token, game_id)
    }

    fn without_move(
        command_type: CommandType,
        auth_token: impl Into<String>,
        game_id: GameId,
    ) -> Self {
        Self {
            command_type,
            auth_token: auth_token.into(),
            game_id,
            chess_move: None,
        }
    }
}

/// Outbound message envelope
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    LoadGame(GameRecord),
    Notification(String),
    Error(String),
}

impl ServerMessage {
    pub fn notification(text: impl Into<String>) -> Self {
        ServerMessage::Notification(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        ServerMessage::Error(text.into())
    }

    pub fn is_load_game(&self) -> bool {
        matches!(self, ServerMessage::LoadGame(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error(_))
    }

    /// Get the message type as a string
    pub fn message_type(&self) -> &'static str {
        match self {
            ServerMessage::LoadGame(_) => "LOAD_GAME",
            ServerMessage::Notification(_) => "NOTIFICATION",
            ServerMessage::Error(_) => "ERROR",
        }
    }
}
