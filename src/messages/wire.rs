//! Length-prefixed framing: a 4-byte big-endian length followed by a
//! bincode-encoded body.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, trace, warn};

// Wire protocol constants
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024; // 1MB; a full game record is a few KB
pub const MIN_MESSAGE_SIZE: usize = 1;
pub const LENGTH_PREFIX_SIZE: usize = 4;
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Message size limit and write timeout. Reads are not bounded: an idle
/// player is a normal connection.
#[derive(Debug, Clone)]
pub struct WireConfig {
    pub max_message_size: usize,
    pub write_timeout: Duration,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_message_size: MAX_MESSAGE_SIZE,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl WireConfig {
    pub fn new(max_message_size: usize, write_timeout: Duration) -> Self {
        Self {
            max_message_size,
            write_timeout,
        }
    }
}

#[derive(Error, Debug)]
pub enum WireProtocolError {
    #[error("Message too large: {size} bytes exceeds maximum of {max_size} bytes")]
    MessageTooLarge { size: usize, max_size: usize },

    #[error("Message too small: {size} bytes is below minimum of {min_size} bytes")]
    MessageTooSmall { size: usize, min_size: usize },

    #[error("Write operation timed out after {timeout:?}")]
    WriteTimeout { timeout: Duration },

    #[error("Corrupted data: {reason}")]
    CorruptedData { reason: String },

    #[error("Unexpected end of file while reading {operation}")]
    UnexpectedEof { operation: String },

    /// The peer closed the stream cleanly between frames
    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct FramedMessage {
    wire_config: WireConfig,
}

impl FramedMessage {
    pub fn new(wire_config: WireConfig) -> Self {
        Self { wire_config }
    }

    fn validate_message_size(&self, size: usize) -> Result<(), WireProtocolError> {
        if size < MIN_MESSAGE_SIZE {
            warn!(size = size, "Message size is below minimum threshold");
            return Err(WireProtocolError::MessageTooSmall {
                size,
                min_size: MIN_MESSAGE_SIZE,
            });
        }

        if size > self.wire_config.max_message_size {
            error!(
                size = size,
                max_size = self.wire_config.max_message_size,
                "Message size exceeds maximum allowed size"
            );
            return Err(WireProtocolError::MessageTooLarge {
                size,
                max_size: self.wire_config.max_message_size,
            });
        }

        Ok(())
    }

    pub fn encode<T: Serialize>(&self, message: &T) -> Result<Vec<u8>, WireProtocolError> {
        let body = bincode::serialize(message)?;
        self.validate_message_size(body.len())?;

        let mut frame = Vec::with_capacity(LENGTH_PREFIX_SIZE + body.len());
        frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
        frame.extend_from_slice(&body);
        Ok(frame)
    }

    pub async fn write_message<T: Serialize>(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        message: &T,
    ) -> Result<(), WireProtocolError> {
        let frame = self.encode(message)?;
        writer.write_all(&frame).await?;
        writer.flush().await?;
        trace!("Wrote frame of {} bytes", frame.len());
        Ok(())
    }

    pub async fn write_message_with_timeout<T: Serialize>(
        &self,
        writer: &mut (impl AsyncWrite + Unpin),
        message: &T,
    ) -> Result<(), WireProtocolError> {
        let timeout = self.wire_config.write_timeout;
        tokio::time::timeout(timeout, self.write_message(writer, message))
            .await
            .map_err(|_| WireProtocolError::WriteTimeout { timeout })?
    }

    /// Read one frame. EOF before any byte of the length prefix is a clean
    /// close; EOF anywhere else is an error.
    pub async fn read_message<T: DeserializeOwned>(
        &self,
        reader: &mut (impl AsyncRead + Unpin),
    ) -> Result<T, WireProtocolError> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        let first = reader.read(&mut prefix).await?;
        if first == 0 {
            return Err(WireProtocolError::ConnectionClosed);
        }
        read_exact_or_eof(reader, &mut prefix[first..], "length prefix").await?;

        let length = u32::from_be_bytes(prefix) as usize;
        self.validate_message_size(length)?;

        let mut body = vec![0u8; length];
        read_exact_or_eof(reader, &mut body, "message body").await?;

        let message = bincode::deserialize(&body).map_err(|e| {
            error!(error = %e, data_size = length, "Failed to decode frame");
            WireProtocolError::CorruptedData {
                reason: format!("Failed to decode message: {}", e),
            }
        })?;
        debug!("Read frame of {} bytes", length);
        Ok(message)
    }
}

async fn read_exact_or_eof(
    reader: &mut (impl AsyncRead + Unpin),
    buffer: &mut [u8],
    operation: &str,
) -> Result<(), WireProtocolError> {
    if buffer.is_empty() {
        return Ok(());
    }
    match reader.read_exact(buffer).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            Err(WireProtocolError::UnexpectedEof {
                operation: operation.to_string(),
            })
        }
        Err(e) => Err(e.into()),
    }
}
