use gambit::{Board, Color, Move, Piece, PieceType, Position};

pub fn pos(square: &str) -> Position {
    square.parse().expect("valid square")
}

pub fn mv(notation: &str) -> Move {
    notation.parse().expect("valid move")
}

/// Build a board from `(square, color, piece)` triples on an otherwise empty board
pub fn board_with(pieces: &[(&str, Color, PieceType)]) -> Board {
    let mut board = Board::empty();
    for &(square, color, piece_type) in pieces {
        board.set_piece(pos(square), Some(Piece::new(color, piece_type)));
    }
    board
}

/// White rook on e8 mates the black king boxed in by its own pawns
pub fn back_rank_mate() -> Board {
    board_with(&[
        ("e1", Color::White, PieceType::King),
        ("e8", Color::White, PieceType::Rook),
        ("h8", Color::Black, PieceType::King),
        ("g7", Color::Black, PieceType::Pawn),
        ("h7", Color::Black, PieceType::Pawn),
    ])
}

/// Black to move, no legal moves, not in check
pub fn stalemate() -> Board {
    board_with(&[
        ("h8", Color::Black, PieceType::King),
        ("f7", Color::White, PieceType::Queen),
        ("g6", Color::White, PieceType::King),
    ])
}

/// A quiet middlegame-ish sequence used to reach non-trivial positions
pub const OPENING: &[&str] = &[
    "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "d2d3", "f8c5", "c1g5", "d7d6", "b1c3",
    "c8g4",
];
