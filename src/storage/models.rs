use crate::chess::{Color, Game};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(GameId)
    }
}

/// Role of a user within one game, derived from the record's player slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player(Color),
    Observer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Player(color) => write!(f, "{}", color.as_str()),
            Role::Observer => write!(f, "an observer"),
        }
    }
}

/// The persisted unit: player assignments, display name and the rules-engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: Game,
}

impl GameRecord {
    /// A fresh record with no players and the standard starting position
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        Self {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: Game::new(),
        }
    }

    pub fn player(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, color: Color) -> &mut Option<String> {
        match color {
            Color::White => &mut self.white_username,
            Color::Black => &mut self.black_username,
        }
    }

    /// White takes precedence when one user holds both slots
    pub fn role_of(&self, username: &str) -> Role {
        if self.player(Color::White) == Some(username) {
            Role::Player(Color::White)
        } else if self.player(Color::Black) == Some(username) {
            Role::Player(Color::Black)
        } else {
            Role::Observer
        }
    }

    pub fn controls(&self, username: &str, color: Color) -> bool {
        self.player(color) == Some(username)
    }

    pub fn is_player(&self, username: &str) -> bool {
        self.role_of(username) != Role::Observer
    }

    /// Clear whichever slots `username` holds. Returns whether anything changed.
    pub fn remove_player(&mut self, username: &str) -> bool {
        let mut removed = false;
        for color in [Color::White, Color::Black] {
            let slot = self.slot_mut(color);
            if slot.as_deref() == Some(username) {
                *slot = None;
                removed = true;
            }
        }
        removed
    }
}
