use gambit::session::{ConnectionHandle, SessionHandler, SessionRegistry};
use gambit::storage::{AuthStore, GameId, GameStore, MemoryStore};
use gambit::{Color, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;

/// An in-memory handler with one game: alice plays white, bob plays black
pub struct SessionFixture {
    pub store: Arc<MemoryStore>,
    pub handler: Arc<SessionHandler>,
    pub game_id: GameId,
}

pub struct TestClient {
    pub token: String,
    pub connection: ConnectionHandle,
    pub inbox: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestClient {
    /// Everything queued so far
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.inbox.try_recv() {
            messages.push(message);
        }
        messages
    }
}

impl SessionFixture {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let handler = Arc::new(SessionHandler::new(
            store.clone(),
            store.clone(),
            Arc::new(SessionRegistry::new()),
        ));
        let record = store.create_game("fixture").expect("create game");
        store
            .add_player(record.game_id, Color::White, "alice")
            .expect("seat alice");
        store
            .add_player(record.game_id, Color::Black, "bob")
            .expect("seat bob");

        Self {
            store,
            handler,
            game_id: record.game_id,
        }
    }

    pub fn client(&self, username: &str) -> TestClient {
        let token = self.store.issue_token(username).expect("issue token");
        let (tx, inbox) = mpsc::unbounded_channel();
        TestClient {
            token,
            connection: self.handler.registry().open_connection(tx),
            inbox,
        }
    }

    /// Issue a token, CONNECT, and discard the join traffic
    pub fn connected(&self, username: &str) -> TestClient {
        let mut client = self.client(username);
        self.handler.handle(
            &client.connection,
            gambit::ClientCommand::connect(&client.token, self.game_id),
        );
        client.drain();
        client
    }
}

impl Default for SessionFixture {
    fn default() -> Self {
        Self::new()
    }
}
