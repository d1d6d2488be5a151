//! Pseudo-legal move generation shared by all piece types.
//!
//! Directions are `(d_row, d_column)` pairs. Output order is deterministic:
//! rays in the order given, each walked outward one square at a time.

use super::board::Board;
use super::moves::Move;
use super::piece::{Color, PieceType};
use super::position::Position;

/// Right, left, up, down
pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Up-right, down-right, up-left, down-left
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

pub const ALL_RAYS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

/// Walk each ray until it leaves the board, hits a friendly piece (excluded) or
/// an enemy piece (included, then stop). `limit` caps the steps per ray.
pub fn ray_moves(
    board: &Board,
    from: Position,
    color: Color,
    directions: &[(i8, i8)],
    limit: Option<u8>,
) -> Vec<Move> {
    let mut moves = Vec::new();
    for &(d_row, d_column) in directions {
        let mut current = from;
        let mut steps = 0u8;
        while let Some(next) = current.offset(d_row, d_column) {
            if limit.is_some_and(|max| steps >= max) {
                break;
            }
            steps += 1;
            match board.get_piece(next) {
                None => moves.push(Move::new(from, next)),
                Some(other) if other.color != color => {
                    moves.push(Move::new(from, next));
                    break;
                }
                Some(_) => break,
            }
            current = next;
        }
    }
    moves
}

/// Single jumps to fixed offsets; any square not held by a friendly piece is a target.
pub fn step_moves(board: &Board, from: Position, color: Color, offsets: &[(i8, i8)]) -> Vec<Move> {
    offsets
        .iter()
        .filter_map(|&(d_row, d_column)| from.offset(d_row, d_column))
        .filter(|to| board.get_piece(*to).map_or(true, |other| other.color != color))
        .map(|to| Move::new(from, to))
        .collect()
}

pub fn pawn_moves(board: &Board, from: Position, color: Color) -> Vec<Move> {
    let forward = color.forward();
    let mut targets = Vec::with_capacity(4);

    if let Some(one) = from.offset(forward, 0) {
        if board.get_piece(one).is_none() {
            targets.push(one);
            if from.row() == color.pawn_home_row() {
                if let Some(two) = from.offset(2 * forward, 0) {
                    if board.get_piece(two).is_none() {
                        targets.push(two);
                    }
                }
            }
        }
    }

    for d_column in [-1, 1] {
        if let Some(diagonal) = from.offset(forward, d_column) {
            if board
                .get_piece(diagonal)
                .is_some_and(|other| other.color != color)
            {
                targets.push(diagonal);
            }
        }
    }

    let mut moves = Vec::with_capacity(targets.len());
    for to in targets {
        if to.row() == color.promotion_row() {
            moves.extend(
                PieceType::PROMOTIONS
                    .iter()
                    .map(|&promotion| Move::with_promotion(from, to, promotion)),
            );
        } else {
            moves.push(Move::new(from, to));
        }
    }
    moves
}
