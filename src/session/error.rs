use crate::chess::ChessError;
use crate::storage::StorageError;
use thiserror::Error;

/// Everything that can stop a command. All variants end up as a unicast
/// `ERROR` to the sender; none of them mutate state or broadcast.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Chess(#[from] ChessError),

    #[error("The game is over")]
    GameOver,

    #[error("Missing chess move")]
    MissingMove,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("Only players can resign")]
    NotAPlayer,
}

impl SessionError {
    /// Faults in the server itself rather than in the client's request
    pub fn is_internal(&self) -> bool {
        match self {
            SessionError::Chess(e) => !e.is_recoverable(),
            SessionError::Storage(e) => !matches!(
                e,
                StorageError::NotFound(_)
                    | StorageError::Unauthorized
                    | StorageError::AlreadyTaken(_)
            ),
            _ => false,
        }
    }

    /// Text sent back in the `ERROR` message
    pub fn client_message(&self) -> String {
        if self.is_internal() {
            "Error: internal server error".to_string()
        } else {
            format!("Error: {}", self)
        }
    }
}
