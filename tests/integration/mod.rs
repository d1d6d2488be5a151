//! Integration tests for the session server
//!
//! Protocol tests drive `SessionHandler` directly over in-memory stores;
//! server tests go through real TCP connections.

// Command state machine
pub mod session_protocol;

// Concurrent commands on one game
pub mod session_concurrency;
