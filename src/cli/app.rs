use crate::chess::Color;
use crate::messages::wire::{WireConfig, MAX_MESSAGE_SIZE};
use crate::network::Server;
use crate::session::{SessionHandler, SessionRegistry};
use crate::storage::{get_database_path, AuthStore, Database, GameId, GameStore};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Application configuration, kept in `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the SQLite database
    pub data_dir: PathBuf,
    /// Default bind address for `gambit serve`
    pub bind_addr: String,
    /// Largest accepted frame body in bytes
    pub max_message_size: usize,
    pub write_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = get_database_path()
            .ok()
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir,
            bind_addr: "127.0.0.1:8080".to_string(),
            max_message_size: MAX_MESSAGE_SIZE,
            write_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn default_config_file() -> Result<PathBuf> {
        ProjectDirs::from("dev", "gambit", "gambit")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub fn load_or_create_default() -> Result<Self> {
        let config_file = Self::default_config_file()?;
        if config_file.exists() {
            Self::load_from(&config_file)
        } else {
            let config = Config::default();
            config.save_to(&config_file)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        toml::from_str(&content).context("Failed to parse configuration file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content).context("Failed to write configuration file")?;
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("database.sqlite")
    }

    pub fn wire_config(&self) -> WireConfig {
        WireConfig::new(
            self.max_message_size,
            Duration::from_secs(self.write_timeout_secs),
        )
    }
}

/// Main application state
pub struct App {
    pub config: Config,
    pub database: Arc<Database>,
}

impl App {
    /// Load config.toml and open the database it points at.
    /// `GAMBIT_DATA_DIR` overrides the configured data directory.
    pub fn new() -> Result<Self> {
        let mut config =
            Config::load_or_create_default().context("Failed to initialize configuration")?;
        if let Ok(data_dir) = std::env::var("GAMBIT_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let database = Database::open(&config.database_path()).with_context(|| {
            format!("Failed to open database at {}", config.database_path().display())
        })?;
        Ok(Self {
            config,
            database: Arc::new(database),
        })
    }

    pub async fn handle_serve(&self, bind: Option<String>) -> Result<()> {
        let bind = bind.unwrap_or_else(|| self.config.bind_addr.clone());
        let handler = Arc::new(SessionHandler::new(
            self.database.clone(),
            self.database.clone(),
            Arc::new(SessionRegistry::new()),
        ));
        let server = Server::bind(&bind, handler, self.config.wire_config()).await?;
        info!("Serving games from {}", self.config.database_path().display());

        tokio::select! {
            result = server.run() => result,
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for shutdown signal")?;
                info!("Shutting down");
                Ok(())
            }
        }
    }

    pub fn handle_token_issue(&self, username: &str) -> Result<String> {
        let token = self
            .database
            .issue_token(username)
            .context("Failed to issue token")?;
        println!("{}", token);
        Ok(token)
    }

    pub fn handle_token_revoke(&self, token: &str) -> Result<()> {
        self.database.revoke(token).context("Failed to revoke token")?;
        println!("Token revoked.");
        Ok(())
    }

    pub fn handle_game_create(&self, name: &str) -> Result<GameId> {
        let record = self
            .database
            .create_game(name)
            .context("Failed to create game")?;
        println!("Created game {} ({})", record.game_id, record.game_name);
        Ok(record.game_id)
    }

    pub fn handle_game_list(&self) -> Result<()> {
        let games = self
            .database
            .list_games()
            .context("Failed to retrieve games from database")?;

        if games.is_empty() {
            println!("No games found.");
            println!("Use 'gambit game create <name>' to start a new game.");
            return Ok(());
        }

        println!(
            "{:<6} {:<20} {:<16} {:<16} {:<14}",
            "ID", "NAME", "WHITE", "BLACK", "TURN"
        );
        println!("{}", "-".repeat(76));
        for record in &games {
            println!(
                "{:<6} {:<20} {:<16} {:<16} {:<14}",
                record.game_id,
                record.game_name,
                record.white_username.as_deref().unwrap_or("-"),
                record.black_username.as_deref().unwrap_or("-"),
                record.game.turn().to_string()
            );
        }
        println!("Total games: {}", games.len());
        Ok(())
    }

    pub fn handle_game_join(&self, game_id: u32, color: &str, username: &str) -> Result<()> {
        let color: Color = color
            .parse()
            .with_context(|| format!("Invalid color '{}': expected white or black", color))?;
        self.database
            .add_player(GameId(game_id), color, username)
            .with_context(|| format!("Failed to join game {}", game_id))?;
        println!("{} joined game {} as {}", username, game_id, color.as_str());
        Ok(())
    }

    pub fn handle_admin_clear(&self) -> Result<()> {
        self.database.clear().context("Failed to clear games")?;
        println!("All games deleted.");
        Ok(())
    }
}
