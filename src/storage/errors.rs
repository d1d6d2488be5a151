use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] rusqlite::Error),

    #[error("Migration {version} failed: {reason}")]
    MigrationFailed { version: i32, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Already taken: {0}")]
    AlreadyTaken(String),

    #[error("Serialization error: {context}: {source}")]
    SerializationError {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database path error: {0}")]
    DatabasePathError(String),
}

impl StorageError {
    pub fn game_not_found(game_id: impl std::fmt::Display) -> Self {
        StorageError::NotFound(format!("game {}", game_id))
    }

    pub fn migration_failed(version: i32, reason: impl Into<String>) -> Self {
        StorageError::MigrationFailed {
            version,
            reason: reason.into(),
        }
    }

    pub fn serialization_error(context: impl Into<String>, source: serde_json::Error) -> Self {
        StorageError::SerializationError {
            context: context.into(),
            source,
        }
    }

    pub fn database_path_error(reason: impl Into<String>) -> Self {
        StorageError::DatabasePathError(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
