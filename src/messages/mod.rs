pub mod types;
pub mod wire;

pub use types::{ClientCommand, CommandType, ServerMessage};
pub use wire::{
    FramedMessage, WireConfig, WireProtocolError, DEFAULT_WRITE_TIMEOUT, LENGTH_PREFIX_SIZE,
    MAX_MESSAGE_SIZE, MIN_MESSAGE_SIZE,
};
