use super::error::ChessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A square on the board. Rows and columns are 1-based: row 1 is White's back
/// rank and column 1 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    column: u8,
}

/// Unvalidated serde form; decoding goes through [`Position::new`]
#[derive(Serialize, Deserialize)]
struct RawPosition {
    row: u8,
    column: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = ChessError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        let coordinate = |v: u8| i8::try_from(v).unwrap_or(i8::MAX);
        Position::new(coordinate(raw.row), coordinate(raw.column))
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition {
            row: pos.row,
            column: pos.column,
        }
    }
}

impl Position {
    pub fn new(row: i8, column: i8) -> Result<Self, ChessError> {
        if !(1..=8).contains(&row) || !(1..=8).contains(&column) {
            return Err(ChessError::InvalidCoordinate { row, column });
        }

        Ok(Self {
            row: row as u8,
            column: column as u8,
        })
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn column(&self) -> u8 {
        self.column
    }

    /// The square `(d_row, d_column)` away, or `None` if that falls off the board
    pub fn offset(&self, d_row: i8, d_column: i8) -> Option<Position> {
        Position::new(self.row as i8 + d_row, self.column as i8 + d_column).ok()
    }

    /// Create position from file and rank characters
    pub fn from_chars(file: char, rank: char) -> Result<Self, ChessError> {
        let file_lower = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file_lower) || !('1'..='8').contains(&rank) {
            return Err(ChessError::InvalidNotation(format!(
                "'{}{}' is not a square (expected a1-h8)",
                file, rank
            )));
        }

        Ok(Position {
            row: rank as u8 - b'0',
            column: file_lower as u8 - b'a' + 1,
        })
    }

    pub fn file_char(&self) -> char {
        (b'a' + self.column - 1) as char
    }

    pub fn rank_char(&self) -> char {
        (b'0' + self.row) as char
    }

    /// All 64 squares, row by row starting from row 1
    pub fn all() -> impl Iterator<Item = Position> {
        (1..=8).flat_map(|row| (1..=8).map(move |column| Position { row, column }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(file, rank),
            _ => Err(ChessError::InvalidNotation(format!(
                "Position must be exactly 2 characters (e.g., 'e4'), got '{}'",
                s
            ))),
        }
    }
}
