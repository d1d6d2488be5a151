use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gambit")]
#[command(about = "A multiplayer chess server with a line-based client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the session server
    Serve {
        /// Address to listen on. Defaults to `bind_addr` from config.toml
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Auth token management
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },

    /// Create, list and join games
    Game {
        #[command(subcommand)]
        command: GameCommand,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Join a running game from the terminal
    ///
    /// Reads commands from stdin, one per line:
    ///   e2e4, e7e8=q      make a move
    ///   moves e2          list legal moves from a square
    ///   resign            resign the game
    ///   leave             leave the game and exit
    ///
    /// Example: gambit play 127.0.0.1:8080 1 --token <token>
    Play {
        /// Server address (e.g., 127.0.0.1:8080)
        address: String,
        /// Numeric game id
        game_id: u32,
        /// Auth token from `gambit token issue`
        #[arg(short, long)]
        token: String,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Issue a new auth token for a username
    Issue { username: String },
    /// Revoke an auth token
    Revoke { token: String },
}

#[derive(Subcommand)]
pub enum GameCommand {
    /// Create a new game in the starting position
    Create { name: String },
    /// List all games with their players and turn
    List,
    /// Seat a user as white or black
    Join {
        game_id: u32,
        /// 'white' or 'black'
        color: String,
        username: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Delete every game
    Clear,
}
