//! Common test utilities and helper modules
//!
//! Board builders, an in-memory session fixture and a loopback server shared
//! by the test crates. Not every crate uses every helper.
#![allow(dead_code)]

pub mod server;
pub mod session;
pub mod test_data;
