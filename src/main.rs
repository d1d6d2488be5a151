use anyhow::Result;
use clap::Parser;
use gambit::cli::{play, AdminCommand, App, Cli, Commands, Config, GameCommand, TokenCommand};
use gambit::storage::GameId;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // The line client never touches the local database
        Commands::Play {
            address,
            game_id,
            token,
        } => {
            let config = Config::load_or_create_default()?;
            play::run(&address, GameId(game_id), &token, config.wire_config()).await
        }
        command => run_local(App::new()?, command).await,
    }
}

async fn run_local(app: App, command: Commands) -> Result<()> {
    match command {
        Commands::Serve { bind } => app.handle_serve(bind).await?,
        Commands::Token { command } => match command {
            TokenCommand::Issue { username } => {
                app.handle_token_issue(&username)?;
            }
            TokenCommand::Revoke { token } => app.handle_token_revoke(&token)?,
        },
        Commands::Game { command } => match command {
            GameCommand::Create { name } => {
                app.handle_game_create(&name)?;
            }
            GameCommand::List => app.handle_game_list()?,
            GameCommand::Join {
                game_id,
                color,
                username,
            } => app.handle_game_join(game_id, &color, &username)?,
        },
        Commands::Admin { command } => match command {
            AdminCommand::Clear => app.handle_admin_clear()?,
        },
        Commands::Play { .. } => anyhow::bail!("play does not run against the local database"),
    }
    Ok(())
}
