use crate::chess::{Color, Game, Move};
use crate::messages::{ClientCommand, CommandType, ServerMessage};
use crate::session::error::SessionError;
use crate::session::registry::{ConnectionHandle, ConnectionId, SessionRegistry};
use crate::storage::{AuthStore, GameId, GameRecord, GameStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

/// What the side that just lost the move is facing. At most one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Checkmate,
    Stalemate,
    Check,
    Continue,
}

fn outcome_for(game: &Game, color: Color) -> Result<Outcome, SessionError> {
    Ok(if game.is_in_checkmate(color)? {
        Outcome::Checkmate
    } else if game.is_in_stalemate(color)? {
        Outcome::Stalemate
    } else if game.is_in_check(color)? {
        Outcome::Check
    } else {
        Outcome::Continue
    })
}

/// "bob (black)", or just "black" for an empty seat
fn describe_side(record: &GameRecord, color: Color) -> String {
    match record.player(color) {
        Some(name) => format!("{} ({})", name, color.as_str()),
        None => color.as_str().to_string(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Protocol state machine for CONNECT / MAKE_MOVE / LEAVE / RESIGN.
///
/// Every command for a game runs under that game's mutex, from loading the
/// record to the last broadcast, so two commands for the same game never
/// validate against the same snapshot.
pub struct SessionHandler {
    auth: Arc<dyn AuthStore>,
    games: Arc<dyn GameStore>,
    registry: Arc<SessionRegistry>,
    game_locks: Mutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl SessionHandler {
    pub fn new(
        auth: Arc<dyn AuthStore>,
        games: Arc<dyn GameStore>,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            auth,
            games,
            registry,
            game_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Run `f` under the mutex for `game_id`. The entry is dropped again once
    /// no other command holds or waits on it, so the map only ever holds the
    /// games with commands in flight.
    fn with_game_lock<T>(&self, game_id: GameId, f: impl FnOnce() -> T) -> T {
        let game_lock = lock(&self.game_locks).entry(game_id).or_default().clone();
        let result = {
            let _guard = lock(&game_lock);
            f()
        };
        drop(game_lock);

        let mut locks = lock(&self.game_locks);
        if locks
            .get(&game_id)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&game_id);
        }
        result
    }

    /// Handle one inbound command. Failures are reported to `origin` only.
    pub fn handle(&self, origin: &ConnectionHandle, command: ClientCommand) {
        let command_type = command.command_type;
        let game_id = command.game_id;

        if let Err(e) = self.dispatch(origin, command) {
            if e.is_internal() {
                error!(%game_id, command = %command_type, error = %e, "Command failed");
            } else {
                debug!(%game_id, command = %command_type, error = %e, "Command rejected");
            }
            if !origin.send(ServerMessage::error(e.client_message())) {
                warn!(connection_id = %origin.id(), "Could not deliver error, connection closed");
            }
        }
    }

    fn dispatch(
        &self,
        origin: &ConnectionHandle,
        command: ClientCommand,
    ) -> Result<(), SessionError> {
        let identity = self.auth.resolve_identity(&command.auth_token)?;

        self.with_game_lock(command.game_id, || -> Result<(), SessionError> {
            let record = self.games.load(command.game_id)?;
            info!(
                game_id = %command.game_id,
                identity = %identity,
                command = %command.command_type,
                "Handling command"
            );

            match command.command_type {
                CommandType::Connect => self.connect(&identity, record, origin),
                CommandType::MakeMove => self.make_move(&identity, record, command.chess_move),
                CommandType::Leave => self.leave(&identity, record),
                CommandType::Resign => self.resign(&identity, record),
            }
        })
    }

    fn connect(
        &self,
        identity: &str,
        record: GameRecord,
        origin: &ConnectionHandle,
    ) -> Result<(), SessionError> {
        let game_id = record.game_id;
        let role = record.role_of(identity);

        self.registry.add(identity, game_id, origin.clone());
        self.registry.send(identity, ServerMessage::LoadGame(record));
        self.registry.broadcast(
            Some(identity),
            game_id,
            ServerMessage::notification(format!("{} connected to the game as {}", identity, role)),
        );
        Ok(())
    }

    fn make_move(
        &self,
        identity: &str,
        mut record: GameRecord,
        chess_move: Option<Move>,
    ) -> Result<(), SessionError> {
        let side = record.game.turn().color().ok_or(SessionError::GameOver)?;
        let chess_move = chess_move.ok_or(SessionError::MissingMove)?;
        if !record.controls(identity, side) {
            return Err(SessionError::NotYourTurn);
        }

        record.game.make_move(chess_move)?;
        // Evaluated before anything is written so that a corrupt board fails
        // the command without a partial update.
        let opponent = side.opposite();
        let outcome = outcome_for(&record.game, opponent)?;
        if matches!(outcome, Outcome::Checkmate | Outcome::Stalemate) {
            record.game.end();
        }

        let game_id = record.game_id;
        self.games.store(&record)?;
        info!(%game_id, identity, chess_move = %chess_move, ?outcome, "Move accepted");

        self.registry
            .broadcast(None, game_id, ServerMessage::LoadGame(record.clone()));
        self.registry.broadcast(
            Some(identity),
            game_id,
            ServerMessage::notification(format!("{} moved {}", identity, chess_move)),
        );

        let status = match outcome {
            Outcome::Checkmate => Some(format!(
                "{} is in checkmate. {} wins",
                describe_side(&record, opponent),
                describe_side(&record, side)
            )),
            Outcome::Stalemate => Some(format!(
                "{} is in stalemate. The game is a draw",
                describe_side(&record, opponent)
            )),
            Outcome::Check => Some(format!("{} is in check", describe_side(&record, opponent))),
            Outcome::Continue => None,
        };

        if let Some(text) = status {
            self.registry
                .broadcast(None, game_id, ServerMessage::notification(text));
        }
        Ok(())
    }

    fn leave(&self, identity: &str, record: GameRecord) -> Result<(), SessionError> {
        let game_id = record.game_id;
        if record.is_player(identity) {
            self.games.clear_player_slot(game_id, identity)?;
        }
        self.registry.remove(identity);
        self.registry.broadcast(
            Some(identity),
            game_id,
            ServerMessage::notification(format!("{} left the game", identity)),
        );
        Ok(())
    }

    fn resign(&self, identity: &str, mut record: GameRecord) -> Result<(), SessionError> {
        if record.game.turn().is_ended() {
            return Err(SessionError::GameOver);
        }
        if !record.is_player(identity) {
            return Err(SessionError::NotAPlayer);
        }

        record.game.end();
        self.games.store(&record)?;
        self.registry.broadcast(
            None,
            record.game_id,
            ServerMessage::notification(format!("{} resigned. The game is over", identity)),
        );
        Ok(())
    }

    /// Transport closed without LEAVE: forget the connection and tell the
    /// rest of each game. Player seats are kept for a reconnect.
    pub fn disconnect(&self, connection: ConnectionId) {
        for (identity, game_id) in self.registry.remove_connection(connection) {
            info!(%game_id, identity = %identity, "Participant disconnected");
            self.registry.broadcast(
                None,
                game_id,
                ServerMessage::notification(format!("{} disconnected", identity)),
            );
        }
    }
}
