use crate::messages::wire::WireConfig;
use crate::messages::{ClientCommand, ServerMessage};
use crate::network::connection::{Connection, ConnectionError, ConnectionReader, ConnectionWriter};
use tracing::debug;

/// Client side of the session protocol
pub struct Client {
    connection: Connection,
}

impl Client {
    pub async fn connect(addr: &str, wire_config: WireConfig) -> Result<Self, ConnectionError> {
        let connection = Connection::connect(addr, wire_config).await?;
        Ok(Self { connection })
    }

    pub async fn send_command(&mut self, command: &ClientCommand) -> Result<(), ConnectionError> {
        debug!(command = %command.command_type, game_id = %command.game_id, "Sending command");
        self.connection.send(command).await
    }

    pub async fn receive_message(&mut self) -> Result<ServerMessage, ConnectionError> {
        self.connection.receive().await
    }

    /// Commands go out on the writer while the reader keeps receiving pushes
    pub fn into_split(self) -> (ConnectionReader, ConnectionWriter) {
        self.connection.into_split()
    }

    pub async fn close(self) -> Result<(), ConnectionError> {
        self.connection.close().await
    }
}
