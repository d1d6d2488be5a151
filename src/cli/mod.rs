pub mod app;
pub mod commands;
pub mod play;

pub use app::{App, Config};
pub use commands::{AdminCommand, Cli, Commands, GameCommand, TokenCommand};
