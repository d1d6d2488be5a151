use crate::messages::ServerMessage;
use crate::storage::GameId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Sending half of a connection's outbound queue. A writer task owned by the
/// network layer drains the other half onto the socket.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live transport connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbox: Outbox,
}

impl ConnectionHandle {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a message; false if the connection is gone
    pub fn send(&self, message: ServerMessage) -> bool {
        self.outbox.send(message).is_ok()
    }
}

struct Entry {
    game_id: GameId,
    connection: ConnectionHandle,
}

#[derive(Default)]
struct Inner {
    by_identity: HashMap<String, Entry>,
    by_game: HashMap<GameId, HashSet<String>>,
}

impl Inner {
    fn detach(&mut self, identity: &str) -> Option<Entry> {
        let entry = self.by_identity.remove(identity)?;
        if let Some(members) = self.by_game.get_mut(&entry.game_id) {
            members.remove(identity);
            if members.is_empty() {
                self.by_game.remove(&entry.game_id);
            }
        }
        Some(entry)
    }
}

/// Maps identities to live connections and games to their participants.
///
/// One mutex guards both maps. Messages are only queued on unbounded
/// channels, and that happens after the lock is released.
#[derive(Default)]
pub struct SessionRegistry {
    inner: Mutex<Inner>,
    next_connection_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wrap a freshly accepted connection's outbox with a unique id
    pub fn open_connection(&self, outbox: Outbox) -> ConnectionHandle {
        let id = ConnectionId(self.next_connection_id.fetch_add(1, Ordering::Relaxed) + 1);
        ConnectionHandle { id, outbox }
    }

    /// Register `identity` in `game_id`. An identity lives in one game at a
    /// time; registering again moves it.
    pub fn add(&self, identity: &str, game_id: GameId, connection: ConnectionHandle) {
        let mut inner = self.lock();
        inner.detach(identity);
        inner
            .by_game
            .entry(game_id)
            .or_default()
            .insert(identity.to_string());
        inner
            .by_identity
            .insert(identity.to_string(), Entry { game_id, connection });
        debug!(identity, %game_id, "Registered connection");
    }

    /// Returns the game the identity was registered in
    pub fn remove(&self, identity: &str) -> Option<GameId> {
        self.lock().detach(identity).map(|entry| entry.game_id)
    }

    /// Drop every registration made over a closed transport connection
    pub fn remove_connection(&self, connection: ConnectionId) -> Vec<(String, GameId)> {
        let mut inner = self.lock();
        let identities: Vec<String> = inner
            .by_identity
            .iter()
            .filter(|(_, entry)| entry.connection.id == connection)
            .map(|(identity, _)| identity.clone())
            .collect();

        identities
            .into_iter()
            .filter_map(|identity| {
                let entry = inner.detach(&identity)?;
                Some((identity, entry.game_id))
            })
            .collect()
    }

    /// Drop `identity` only if it is still bound to `connection`, so a
    /// reconnect on a new connection is not undone by a stale failure.
    fn evict(&self, identity: &str, connection: ConnectionId) {
        let mut inner = self.lock();
        if inner
            .by_identity
            .get(identity)
            .is_some_and(|entry| entry.connection.id == connection)
        {
            inner.detach(identity);
        }
    }

    /// Unicast. Returns false if the identity is unknown or its connection is gone.
    pub fn send(&self, identity: &str, message: ServerMessage) -> bool {
        let connection = match self.lock().by_identity.get(identity) {
            Some(entry) => entry.connection.clone(),
            None => return false,
        };

        if connection.send(message) {
            true
        } else {
            warn!(
                identity,
                connection_id = %connection.id,
                "Dropping message to closed connection"
            );
            self.evict(identity, connection.id);
            false
        }
    }

    /// Send to everyone registered in `game_id` except `exclude`. Returns the
    /// number of recipients the message was queued for.
    pub fn broadcast(
        &self,
        exclude: Option<&str>,
        game_id: GameId,
        message: ServerMessage,
    ) -> usize {
        let recipients: Vec<(String, ConnectionHandle)> = {
            let inner = self.lock();
            let Some(members) = inner.by_game.get(&game_id) else {
                return 0;
            };
            members
                .iter()
                .filter(|identity| Some(identity.as_str()) != exclude)
                .filter_map(|identity| {
                    inner
                        .by_identity
                        .get(identity)
                        .map(|entry| (identity.clone(), entry.connection.clone()))
                })
                .collect()
        };

        let mut delivered = 0;
        for (identity, connection) in recipients {
            if connection.send(message.clone()) {
                delivered += 1;
            } else {
                warn!(identity = %identity, %game_id, "Dropping broadcast to closed connection");
                self.evict(&identity, connection.id);
            }
        }
        delivered
    }

    /// Identities currently registered in a game, sorted
    pub fn participants(&self, game_id: GameId) -> Vec<String> {
        let inner = self.lock();
        let mut identities: Vec<String> = inner
            .by_game
            .get(&game_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        identities.sort();
        identities
    }
}
