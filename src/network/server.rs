use crate::messages::wire::{WireConfig, WireProtocolError};
use crate::messages::{ClientCommand, ServerMessage};
use crate::network::connection::{Connection, ConnectionError, ConnectionWriter};
use crate::session::SessionHandler;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, instrument, warn};

const MAX_CONNECTIONS: usize = 1000;

pub struct Server {
    listener: TcpListener,
    handler: Arc<SessionHandler>,
    wire_config: WireConfig,
}

impl Server {
    pub async fn bind(
        addr: &str,
        handler: Arc<SessionHandler>,
        wire_config: WireConfig,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind server to address: {}", addr))?;

        info!("Server bound to {}", listener.local_addr()?);
        debug!(
            "Wire config - max_message_size: {}, write_timeout: {:?}",
            wire_config.max_message_size, wire_config.write_timeout
        );

        Ok(Self {
            listener,
            handler,
            wire_config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until the task is dropped
    pub async fn run(self) -> Result<()> {
        let mut active_connections: HashMap<usize, JoinHandle<()>> = HashMap::new();
        let mut connection_counter = 0usize;

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            active_connections.retain(|_, handle| !handle.is_finished());
            if active_connections.len() >= MAX_CONNECTIONS {
                warn!(
                    "Connection limit reached ({}), rejecting connection from {}",
                    MAX_CONNECTIONS, peer_addr
                );
                continue;
            }

            connection_counter += 1;
            let counter = connection_counter;
            let handler = Arc::clone(&self.handler);
            let wire_config = self.wire_config.clone();

            let handle = task::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, handler, wire_config).await {
                    error!("Connection from {} failed: {}", peer_addr, e);
                }
            });
            active_connections.insert(counter, handle);
        }
    }
}

/// One task reads and dispatches commands in order, another drains the
/// connection's outbox onto the socket.
#[instrument(skip(stream, peer_addr, handler, wire_config), fields(peer = %peer_addr))]
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    handler: Arc<SessionHandler>,
    wire_config: WireConfig,
) -> Result<()> {
    stream.set_nodelay(true)?;
    let (mut reader, writer) = Connection::new(stream, wire_config).into_split();

    let (outbox, inbox) = mpsc::unbounded_channel();
    let origin = handler.registry().open_connection(outbox);
    info!(connection_id = %origin.id(), "Accepted connection");

    let writer_task = task::spawn(write_loop(writer, inbox));

    loop {
        match reader.receive::<ClientCommand>().await {
            Ok(command) => {
                debug!(
                    command = %command.command_type,
                    game_id = %command.game_id,
                    "Received command"
                );
                let handler = Arc::clone(&handler);
                let connection = origin.clone();
                let handled =
                    task::spawn_blocking(move || handler.handle(&connection, command)).await;
                if let Err(e) = handled {
                    error!("Command handler panicked: {}", e);
                }
            }
            Err(e) if e.is_recoverable() => {
                warn!("Discarding malformed command: {}", e);
                origin.send(ServerMessage::error("Error: malformed command"));
            }
            Err(ConnectionError::ConnectionClosed) => {
                info!(connection_id = %origin.id(), "Connection closed by peer");
                break;
            }
            Err(ConnectionError::WireProtocol(WireProtocolError::MessageTooLarge { size, .. })) => {
                warn!("Closing connection after oversized frame of {} bytes", size);
                break;
            }
            Err(e) => {
                warn!(connection_id = %origin.id(), "Closing connection: {}", e);
                break;
            }
        }
    }

    handler.disconnect(origin.id());
    // The writer finishes once the last sender for this connection is gone.
    drop(origin);
    if let Err(e) = writer_task.await {
        error!("Writer task failed: {}", e);
    }
    Ok(())
}

async fn write_loop(
    mut writer: ConnectionWriter,
    mut inbox: mpsc::UnboundedReceiver<ServerMessage>,
) {
    while let Some(message) = inbox.recv().await {
        if let Err(e) = writer.send(&message).await {
            warn!("Failed to write {}: {}", message.message_type(), e);
            return;
        }
    }
    if let Err(e) = writer.close().await {
        debug!("Error shutting down writer: {}", e);
    }
}
