pub mod error;
pub mod handler;
pub mod registry;

pub use error::SessionError;
pub use handler::SessionHandler;
pub use registry::{ConnectionHandle, ConnectionId, Outbox, SessionRegistry};
