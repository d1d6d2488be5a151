pub mod client;
pub mod connection;
pub mod server;

pub use client::Client;
pub use connection::{Connection, ConnectionError, ConnectionReader, ConnectionWriter};
pub use server::Server;
