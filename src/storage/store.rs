//! Collaborator contracts the session layer depends on, plus an in-memory
//! implementation for tests and embedding.

use crate::chess::Color;
use crate::storage::errors::{Result, StorageError};
use crate::storage::models::{GameId, GameRecord};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Token to identity lookup
pub trait AuthStore: Send + Sync {
    /// Issue a new token for `username`
    fn issue_token(&self, username: &str) -> Result<String>;

    /// Fails with [`StorageError::Unauthorized`] if the token is unknown
    fn resolve_identity(&self, token: &str) -> Result<String>;

    fn revoke(&self, token: &str) -> Result<()>;
}

pub trait GameStore: Send + Sync {
    fn create_game(&self, game_name: &str) -> Result<GameRecord>;

    /// Fails with [`StorageError::NotFound`] if there is no such game
    fn load(&self, game_id: GameId) -> Result<GameRecord>;

    fn list_games(&self) -> Result<Vec<GameRecord>>;

    /// Overwrite the stored record; storing the same record twice is harmless
    fn store(&self, record: &GameRecord) -> Result<()>;

    /// Fails with [`StorageError::AlreadyTaken`] if the slot is occupied
    fn add_player(&self, game_id: GameId, color: Color, username: &str) -> Result<GameRecord>;

    /// Clear any slot `username` holds in the game; a no-op for non-players
    fn clear_player_slot(&self, game_id: GameId, username: &str) -> Result<()>;

    /// Administrative wipe of every game
    fn clear(&self) -> Result<()>;
}

pub(crate) fn new_token() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn claim_slot(record: &mut GameRecord, color: Color, username: &str) -> Result<()> {
    let slot = record.slot_mut(color);
    if slot.is_some() {
        return Err(StorageError::AlreadyTaken(format!(
            "{} in game {}",
            color.as_str(),
            record.game_id
        )));
    }
    *slot = Some(username.to_string());
    Ok(())
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mutex-guarded maps; everything is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    tokens: Mutex<HashMap<String, String>>,
    games: Mutex<BTreeMap<GameId, GameRecord>>,
    next_game_id: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStore for MemoryStore {
    fn issue_token(&self, username: &str) -> Result<String> {
        let token = new_token();
        lock(&self.tokens).insert(token.clone(), username.to_string());
        Ok(token)
    }

    fn resolve_identity(&self, token: &str) -> Result<String> {
        lock(&self.tokens)
            .get(token)
            .cloned()
            .ok_or(StorageError::Unauthorized)
    }

    fn revoke(&self, token: &str) -> Result<()> {
        lock(&self.tokens)
            .remove(token)
            .map(|_| ())
            .ok_or(StorageError::Unauthorized)
    }
}

impl GameStore for MemoryStore {
    fn create_game(&self, game_name: &str) -> Result<GameRecord> {
        let game_id = GameId(self.next_game_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = GameRecord::new(game_id, game_name);
        lock(&self.games).insert(game_id, record.clone());
        Ok(record)
    }

    fn load(&self, game_id: GameId) -> Result<GameRecord> {
        lock(&self.games)
            .get(&game_id)
            .cloned()
            .ok_or_else(|| StorageError::game_not_found(game_id))
    }

    fn list_games(&self) -> Result<Vec<GameRecord>> {
        Ok(lock(&self.games).values().cloned().collect())
    }

    fn store(&self, record: &GameRecord) -> Result<()> {
        let mut games = lock(&self.games);
        match games.get_mut(&record.game_id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StorageError::game_not_found(record.game_id)),
        }
    }

    fn add_player(&self, game_id: GameId, color: Color, username: &str) -> Result<GameRecord> {
        let mut games = lock(&self.games);
        let record = games
            .get_mut(&game_id)
            .ok_or_else(|| StorageError::game_not_found(game_id))?;
        claim_slot(record, color, username)?;
        Ok(record.clone())
    }

    fn clear_player_slot(&self, game_id: GameId, username: &str) -> Result<()> {
        let mut games = lock(&self.games);
        let record = games
            .get_mut(&game_id)
            .ok_or_else(|| StorageError::game_not_found(game_id))?;
        record.remove_player(username);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        lock(&self.games).clear();
        Ok(())
    }
}
