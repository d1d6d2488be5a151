use super::error::ChessError;
use super::piece::PieceType;
use super::position::Position;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub const fn new(start: Position, end: Position) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    pub const fn with_promotion(start: Position, end: Position, promotion: PieceType) -> Self {
        Self {
            start,
            end,
            promotion: Some(promotion),
        }
    }
}

fn notation_regex() -> &'static Regex {
    static NOTATION: OnceLock<Regex> = OnceLock::new();
    NOTATION.get_or_init(|| {
        Regex::new(r"^([a-h][1-8])([a-h][1-8])(?:=([qrbn]))?$")
            .expect("move notation regex is valid")
    })
}

// Square pair with an optional promotion suffix: e2e4, e7e8=q
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.notation_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let captures = notation_regex().captures(&normalized).ok_or_else(|| {
            ChessError::InvalidNotation(format!(
                "Invalid move format '{}'. Expected 'e2e4', or 'e7e8=q' for promotion.",
                s.trim()
            ))
        })?;

        let start = captures[1].parse::<Position>()?;
        let end = captures[2].parse::<Position>()?;
        let promotion = captures
            .get(3)
            .map(|m| m.as_str().parse::<PieceType>())
            .transpose()?;

        Ok(Self {
            start,
            end,
            promotion,
        })
    }
}
