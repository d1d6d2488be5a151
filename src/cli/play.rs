use crate::chess::{Move, Position};
use crate::messages::wire::WireConfig;
use crate::messages::{ClientCommand, ServerMessage};
use crate::network::{Client, ConnectionError, ConnectionReader};
use crate::storage::{GameId, GameRecord};
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

/// One line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayInput {
    Move(Move),
    LegalMoves(Position),
    Resign,
    Leave,
    Help,
}

pub fn parse_input(line: &str) -> Result<PlayInput, String> {
    let mut words = line.split_whitespace();
    let first = words.next().ok_or_else(|| "empty input".to_string())?;
    let input = match first.to_lowercase().as_str() {
        "resign" => PlayInput::Resign,
        "leave" | "quit" => PlayInput::Leave,
        "help" | "?" => PlayInput::Help,
        "moves" => {
            let square = words
                .next()
                .ok_or_else(|| "usage: moves <square>".to_string())?;
            PlayInput::LegalMoves(square.parse().map_err(|e| format!("{}", e))?)
        }
        _ => PlayInput::Move(first.parse().map_err(|e| format!("{}", e))?),
    };
    if words.next().is_some() {
        return Err(format!("unexpected input after '{}'", first));
    }
    Ok(input)
}

const HELP: &str = "Commands: <move> (e2e4, e7e8=q), moves <square>, resign, leave";

/// Status line printed after every board update
pub fn describe_turn(record: &GameRecord) -> String {
    match record.game.turn().color() {
        Some(color) => match record.player(color) {
            Some(name) => format!("Game {}: {} ({}) to move", record.game_id, color, name),
            None => format!("Game {}: {} to move", record.game_id, color),
        },
        None => format!("Game {}: game over", record.game_id),
    }
}

fn legal_moves_text(record: Option<&GameRecord>, square: Position) -> String {
    let Some(record) = record else {
        return "No board received yet".to_string();
    };
    match record.game.legal_moves(square) {
        Ok(moves) if moves.is_empty() => format!("No legal moves from {}", square),
        Ok(moves) => moves
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        Err(e) => format!("Cannot evaluate board: {}", e),
    }
}

async fn forward_messages(
    mut reader: ConnectionReader,
    messages: mpsc::UnboundedSender<Result<ServerMessage, ConnectionError>>,
) {
    loop {
        let received = reader.receive::<ServerMessage>().await;
        let stop = received.is_err();
        if messages.send(received).is_err() || stop {
            return;
        }
    }
}

/// Connect to `address`, join `game_id` and relay stdin commands until the
/// user leaves or the server hangs up.
pub async fn run(
    address: &str,
    game_id: GameId,
    token: &str,
    wire_config: WireConfig,
) -> Result<()> {
    let client = Client::connect(address, wire_config)
        .await
        .with_context(|| format!("Failed to connect to {}", address))?;
    let (reader, mut writer) = client.into_split();

    let (inbox_tx, mut inbox) = mpsc::unbounded_channel();
    tokio::spawn(forward_messages(reader, inbox_tx));

    writer.send(&ClientCommand::connect(token, game_id)).await?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut latest: Option<GameRecord> = None;

    loop {
        tokio::select! {
            received = inbox.recv() => match received {
                Some(Ok(ServerMessage::LoadGame(record))) => {
                    println!("{}", describe_turn(&record));
                    latest = Some(record);
                }
                Some(Ok(ServerMessage::Notification(text))) => println!("{}", text),
                Some(Ok(ServerMessage::Error(text))) => eprintln!("{}", text),
                Some(Err(ConnectionError::ConnectionClosed)) | None => {
                    println!("Server closed the connection");
                    return Ok(());
                }
                Some(Err(e)) => return Err(e).context("Lost connection to server"),
            },
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    debug!("stdin closed");
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                let command = match parse_input(&line) {
                    Ok(PlayInput::Move(mv)) => ClientCommand::make_move(token, game_id, mv),
                    Ok(PlayInput::Resign) => ClientCommand::resign(token, game_id),
                    Ok(PlayInput::Leave) => {
                        writer.send(&ClientCommand::leave(token, game_id)).await?;
                        writer.close().await?;
                        return Ok(());
                    }
                    Ok(PlayInput::LegalMoves(square)) => {
                        println!("{}", legal_moves_text(latest.as_ref(), square));
                        continue;
                    }
                    Ok(PlayInput::Help) => {
                        println!("{}", HELP);
                        continue;
                    }
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };
                writer.send(&command).await?;
            }
        }
    }
}
