use crate::messages::wire::{FramedMessage, WireConfig, WireProtocolError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Wire protocol error: {0}")]
    WireProtocol(WireProtocolError),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WireProtocolError> for ConnectionError {
    fn from(e: WireProtocolError) -> Self {
        match e {
            WireProtocolError::ConnectionClosed => ConnectionError::ConnectionClosed,
            other => ConnectionError::WireProtocol(other),
        }
    }
}

impl ConnectionError {
    /// A bad frame body leaves the stream aligned on the next frame, so the
    /// connection can keep going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ConnectionError::WireProtocol(WireProtocolError::CorruptedData { .. })
        )
    }
}

/// A framed TCP connection. Reads wait indefinitely; writes are bounded by the
/// configured write timeout.
pub struct Connection {
    stream: TcpStream,
    framing: FramedMessage,
}

impl Connection {
    pub fn new(stream: TcpStream, wire_config: WireConfig) -> Self {
        Self {
            stream,
            framing: FramedMessage::new(wire_config),
        }
    }

    pub async fn connect(addr: &str, wire_config: WireConfig) -> Result<Self, ConnectionError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        debug!("Connected to {}", addr);
        Ok(Self::new(stream, wire_config))
    }

    pub async fn send<T: Serialize>(&mut self, message: &T) -> Result<(), ConnectionError> {
        self.framing
            .write_message_with_timeout(&mut self.stream, message)
            .await?;
        Ok(())
    }

    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, ConnectionError> {
        Ok(self.framing.read_message(&mut self.stream).await?)
    }

    /// Split into halves that can be driven from separate tasks
    pub fn into_split(self) -> (ConnectionReader, ConnectionWriter) {
        let (read_half, write_half) = self.stream.into_split();
        (
            ConnectionReader {
                half: read_half,
                framing: self.framing.clone(),
            },
            ConnectionWriter {
                half: write_half,
                framing: self.framing,
            },
        )
    }

    pub async fn close(mut self) -> Result<(), ConnectionError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

pub struct ConnectionReader {
    half: OwnedReadHalf,
    framing: FramedMessage,
}

impl ConnectionReader {
    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, ConnectionError> {
        Ok(self.framing.read_message(&mut self.half).await?)
    }
}

pub struct ConnectionWriter {
    half: OwnedWriteHalf,
    framing: FramedMessage,
}

impl ConnectionWriter {
    pub async fn send<T: Serialize>(&mut self, message: &T) -> Result<(), ConnectionError> {
        self.framing
            .write_message_with_timeout(&mut self.half, message)
            .await?;
        Ok(())
    }

    pub async fn close(mut self) -> Result<(), ConnectionError> {
        self.half.shutdown().await?;
        Ok(())
    }
}
