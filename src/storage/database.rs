use crate::chess::{Color, Game};
use crate::storage::errors::{Result, StorageError};
use crate::storage::models::{GameId, GameRecord};
use crate::storage::schema;
use crate::storage::store::{claim_slot, new_token, AuthStore, GameStore};
use directories::ProjectDirs;
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// SQLite-backed auth and game store.
///
/// A single connection behind a mutex; every trait call is one short
/// statement or transaction.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::database_path_error(format!(
                    "Failed to create database directory: {}",
                    e
                ))
            })?;
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::initialize_schema(&conn)?;
        debug!(
            "Database schema at version {}",
            schema::get_current_version(&conn)?
        );
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Execute a closure with access to the connection
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock();
        f(&conn)
    }

    /// Execute a transaction with automatic rollback on error
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock();
        let tx = conn.unchecked_transaction()?;
        match f(&tx) {
            Ok(result) => {
                tx.commit()?;
                Ok(result)
            }
            Err(e) => {
                let _ = tx.rollback(); // Ignore rollback errors, return original error
                Err(e)
            }
        }
    }
}

fn load_record(conn: &Connection, game_id: GameId) -> Result<GameRecord> {
    conn.query_row(
        r#"
        SELECT id, game_name, white_username, black_username, game
        FROM games
        WHERE id = ?1
        "#,
        [game_id.0],
        record_from_row,
    )
    .optional()?
    .ok_or_else(|| StorageError::game_not_found(game_id))?
}

fn write_record(conn: &Connection, record: &GameRecord) -> Result<()> {
    let game_json = serde_json::to_string(&record.game)
        .map_err(|e| StorageError::serialization_error("game state", e))?;

    let rows_affected = conn.execute(
        r#"
        UPDATE games
        SET game_name = :game_name, white_username = :white, black_username = :black,
            game = :game, updated_at = :updated_at
        WHERE id = :id
        "#,
        named_params! {
            ":id": record.game_id.0,
            ":game_name": record.game_name,
            ":white": record.white_username,
            ":black": record.black_username,
            ":game": game_json,
            ":updated_at": current_timestamp(),
        },
    )?;

    if rows_affected == 0 {
        return Err(StorageError::game_not_found(record.game_id));
    }
    Ok(())
}

/// The game column is decoded after the row is read so that a corrupt JSON
/// blob surfaces as a serialization error rather than a SQLite one.
fn record_from_row(row: &Row) -> rusqlite::Result<Result<GameRecord>> {
    let game_json: String = row.get("game")?;
    let game_id = GameId(row.get("id")?);
    let game_name: String = row.get("game_name")?;
    let white_username: Option<String> = row.get("white_username")?;
    let black_username: Option<String> = row.get("black_username")?;

    Ok(serde_json::from_str::<Game>(&game_json)
        .map_err(|e| StorageError::serialization_error(format!("game {}", game_id), e))
        .map(|game| GameRecord {
            game_id,
            white_username,
            black_username,
            game_name,
            game,
        }))
}

impl AuthStore for Database {
    fn issue_token(&self, username: &str) -> Result<String> {
        let token = new_token();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO auth_tokens (token, username, created_at) VALUES (?1, ?2, ?3)",
                (&token, username, current_timestamp()),
            )?;
            Ok(())
        })?;
        Ok(token)
    }

    fn resolve_identity(&self, token: &str) -> Result<String> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT username FROM auth_tokens WHERE token = ?1",
                [token],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StorageError::Unauthorized)
        })
    }

    fn revoke(&self, token: &str) -> Result<()> {
        self.with_connection(|conn| {
            match conn.execute("DELETE FROM auth_tokens WHERE token = ?1", [token])? {
                0 => Err(StorageError::Unauthorized),
                _ => Ok(()),
            }
        })
    }
}

impl GameStore for Database {
    fn create_game(&self, game_name: &str) -> Result<GameRecord> {
        let game_json = serde_json::to_string(&Game::new())
            .map_err(|e| StorageError::serialization_error("game state", e))?;
        let now = current_timestamp();

        self.with_transaction(|conn| {
            conn.execute(
                r#"
                INSERT INTO games (game_name, game, created_at, updated_at)
                VALUES (:game_name, :game, :created_at, :updated_at)
                "#,
                named_params! {
                    ":game_name": game_name,
                    ":game": game_json,
                    ":created_at": now,
                    ":updated_at": now,
                },
            )?;
            let game_id = u32::try_from(conn.last_insert_rowid()).map_err(|_| {
                StorageError::InvalidData("game id does not fit in 32 bits".to_string())
            })?;
            load_record(conn, GameId(game_id))
        })
    }

    fn load(&self, game_id: GameId) -> Result<GameRecord> {
        self.with_connection(|conn| load_record(conn, game_id))
    }

    fn list_games(&self) -> Result<Vec<GameRecord>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, game_name, white_username, black_username, game
                FROM games
                ORDER BY id
                "#,
            )?;
            let rows = stmt.query_map([], record_from_row)?;
            let mut games = Vec::new();
            for row in rows {
                games.push(row??);
            }
            Ok(games)
        })
    }

    fn store(&self, record: &GameRecord) -> Result<()> {
        self.with_connection(|conn| write_record(conn, record))
    }

    fn add_player(&self, game_id: GameId, color: Color, username: &str) -> Result<GameRecord> {
        self.with_transaction(|conn| {
            let mut record = load_record(conn, game_id)?;
            claim_slot(&mut record, color, username)?;
            write_record(conn, &record)?;
            Ok(record)
        })
    }

    fn clear_player_slot(&self, game_id: GameId, username: &str) -> Result<()> {
        self.with_transaction(|conn| {
            let mut record = load_record(conn, game_id)?;
            if record.remove_player(username) {
                write_record(conn, &record)?;
            }
            Ok(())
        })
    }

    fn clear(&self) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM games", [])?;
            Ok(())
        })
    }
}

/// Get current Unix timestamp
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Get the appropriate database path for the current platform
pub fn get_database_path() -> Result<PathBuf> {
    // Check for test override environment variable first
    if let Ok(custom_data_dir) = std::env::var("GAMBIT_DATA_DIR") {
        let data_dir = PathBuf::from(custom_data_dir);
        return Ok(data_dir.join("database.sqlite"));
    }

    let project_dirs = ProjectDirs::from("dev", "gambit", "gambit").ok_or_else(|| {
        StorageError::database_path_error("Failed to determine application data directory")
    })?;

    Ok(project_dirs.data_dir().join("database.sqlite"))
}
